use crate::infra::{read_answer_file, read_schema_file};
use chrono::Local;
use clap::Args;
use maag_assessment::error::AppError;
use maag_assessment::workflows::assessment::{
    export_file_name, first_incomplete, Advance, AdviceCatalog, AnswerSet, AssessmentService,
    Gender, InMemorySchemaSource, InMemorySubmissionRepository, Occupation, QuestionnaireSchema,
    RespondentProfile, RiskScoringEngine, SchemaRegistry, ScoreResult, SectionKind,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON object of question id to answer (string, or list for the checklist)
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Questionnaire file to resolve answers against (defaults to the built-in schema)
    #[arg(long)]
    pub(crate) schema: Option<PathBuf>,
    /// Print the result as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SchemaArgs {
    /// Questionnaire file to validate (defaults to the built-in schema)
    #[arg(long)]
    pub(crate) path: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Tick this red flag instead of "none of the above"
    #[arg(long)]
    pub(crate) red_flag: Option<String>,
    /// Answer for the trigger question (defaults to "Stres")
    #[arg(long)]
    pub(crate) trigger: Option<String>,
}

fn load_schema(path: Option<&PathBuf>) -> Result<QuestionnaireSchema, AppError> {
    match path {
        Some(path) => read_schema_file(path),
        None => Ok(QuestionnaireSchema::builtin()?),
    }
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let schema = load_schema(args.schema.as_ref())?;
    let raw = read_answer_file(&args.answers)?;
    let answers = AnswerSet::resolve(&schema, raw)?;
    let engine = RiskScoringEngine::new(AdviceCatalog::builtin()?);
    let result = engine.score(&answers);

    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Result unavailable as JSON: {err}"),
        }
        return Ok(());
    }

    if let Some(section) = first_incomplete(&schema, &answers) {
        println!(
            "Warning: section {} ({}) is incomplete; unanswered questions score nothing",
            section.id, section.title
        );
    }

    println!("Symptom breakdown:");
    for contribution in engine.breakdown(&answers) {
        println!(
            "  {:<18} {:<24} +{}",
            contribution.question_id,
            contribution.answer.as_deref().unwrap_or("-"),
            contribution.points
        );
    }
    if answers.has_red_flags() {
        println!("  Red flags present: {}", answers.checklist().join(", "));
    }

    render_result(&result);
    Ok(())
}

pub(crate) fn run_schema_summary(args: SchemaArgs) -> Result<(), AppError> {
    let schema = load_schema(args.path.as_ref())?;
    let source = match &args.path {
        Some(path) => path.display().to_string(),
        None => "built-in default".to_string(),
    };

    println!("Questionnaire ({source}) is valid");
    println!(
        "  {} sections, {} questions",
        schema.len(),
        schema.question_count()
    );
    for section in schema.sections() {
        let kind = match section.kind {
            SectionKind::Standard => "single choice",
            SectionKind::ExclusiveChecklist => "exclusive checklist",
        };
        println!(
            "  [{}] {} ({kind}, {} questions)",
            section.id,
            section.title,
            section.questions.len()
        );
    }
    println!("  Exclusive option: {}", schema.exclusive_option());
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let registry = SchemaRegistry::load(
        Arc::new(InMemorySchemaSource::default()),
        QuestionnaireSchema::builtin()?,
    )?;
    let engine = Arc::new(RiskScoringEngine::new(AdviceCatalog::builtin()?));
    let repository = Arc::new(InMemorySubmissionRepository::default());
    let service = AssessmentService::new(Arc::new(registry), engine.clone(), repository);

    println!("Maag self-assessment demo");
    let respondent = demo_respondent();
    println!(
        "Respondent: {} ({} years, {})",
        respondent.name,
        respondent.age,
        respondent.gender.map(Gender::display_name).unwrap_or("-")
    );

    let mut session = service.start_session();
    if let Err(err) = session.register(respondent) {
        println!("  Registration rejected: {err}");
        return Ok(());
    }

    let trigger = args.trigger.unwrap_or_else(|| "Stres".to_string());
    loop {
        let Some(section) = session.current_section().cloned() else {
            break;
        };
        println!(
            "\n[{}] {} ({}%)",
            section.id,
            section.title,
            session.progress_percent()
        );

        if section.is_checklist() {
            let pick = args
                .red_flag
                .clone()
                .unwrap_or_else(|| session.schema().exclusive_option().to_string());
            match session.toggle_flag(&pick) {
                Ok(selection) => println!("  Checklist: {}", selection.join(", ")),
                Err(err) => println!("  Checklist unavailable: {err}"),
            }
        } else {
            for question in &section.questions {
                let value = demo_answer(&question.id, &trigger);
                println!("  {} -> {}", question.text, value);
                if let Err(err) = session.answer(&question.id, value) {
                    println!("  Answer rejected: {err}");
                }
            }
        }

        match session.advance(&engine) {
            Ok(Advance::Section(_)) => {}
            Ok(Advance::Finished(_)) => break,
            Err(err) => {
                println!("  Cannot continue: {err}");
                return Ok(());
            }
        }
    }

    let Some(result) = session.result().cloned() else {
        println!("\nAssessment did not complete");
        return Ok(());
    };
    render_result(&result);

    match service.record_session(session).and_then(|outcome| outcome.submission_id) {
        Some(id) => println!("\nRecorded as submission #{id}"),
        None => println!("\nSubmission was not recorded"),
    }
    match service.export() {
        Ok(csv) => println!(
            "Admin export {} ({} bytes)",
            export_file_name(Local::now().date_naive()),
            csv.len()
        ),
        Err(err) => println!("Admin export unavailable: {err}"),
    }

    Ok(())
}

fn render_result(result: &ScoreResult) {
    println!("\nRisk level: {}", result.risk_level.label());
    println!("Score: {}%", result.score);
    println!("Advice:");
    for entry in &result.advice {
        println!("  [{}] {}", entry.kind.label(), entry.title);
        println!("      {}", entry.content);
        for item in entry.items.iter().flatten() {
            println!("      - {item}");
        }
    }
}

fn demo_respondent() -> RespondentProfile {
    RespondentProfile {
        name: "Putri Anggraini".to_string(),
        email: "putri.anggraini@example.id".to_string(),
        phone: "0813-2222-4444".to_string(),
        age: 31,
        gender: Some(Gender::Female),
        occupation: Some(Occupation::Professional),
        consent: true,
    }
}

fn demo_answer<'a>(question_id: &str, trigger: &'a str) -> &'a str {
    match question_id {
        "heartburn" | "bloating" => "Ya",
        "nausea" => "Kadang-kadang",
        "duration" => "1–3 hari",
        "trigger" => trigger,
        _ => "Tidak",
    }
}
