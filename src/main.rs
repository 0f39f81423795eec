use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use diabetes_risk::utils::logging::init_logging;
use diabetes_risk::{
    Feature, FeatureVector, HistoryStore, MedicalForm, PredictionTrace, PredictorConfig, RiskError,
    RiskPredictor, Session, Verdict, parse_comma_separated,
};
use log::{debug, info, warn};

#[derive(Debug, Parser)]
#[command(
    name = "diabetes-risk",
    version,
    about = "Estimate diabetes risk from eight clinical measurements",
    long_about = "Estimate diabetes risk from eight clinical measurements.\n\n\
        Values are given as one comma separated line in this order:\n\
        Pregnancies, Glucose, BloodPressure, SkinThickness, Insulin, BMI,\n\
        DiabetesPedigreeFunction, Age. A 0 for Glucose, BloodPressure,\n\
        SkinThickness, Insulin or BMI means \"not measured\".\n\n\
        EXAMPLES:\n\
        \n  diabetes-risk predict 6,148,72,35,0,33.6,0.627,50\n\
        \n  diabetes-risk predict --glucose 148 --bmi 33.6 --age 50\n\
        \n  diabetes-risk --artifacts ./model set-data 1,85,66,29,0,26.6,0.351,31\n\
        \n  diabetes-risk export history.parquet",
    after_help = "This prediction is not a substitute for professional medical advice."
)]
struct Cli {
    /// Increase verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory holding the fitted model artifacts
    #[arg(long, global = true)]
    artifacts: Option<PathBuf>,

    /// CSV file the submitted measurements are appended to
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// The eight measurements, as one comma separated line or field by field
#[derive(Debug, Args)]
struct Measurements {
    /// Comma separated values in schema order
    #[arg(allow_hyphen_values = true)]
    values: Option<String>,

    #[command(flatten)]
    form: FormArgs,
}

/// Field-by-field entry; an omitted field is 0 ("not measured")
#[derive(Debug, Args)]
struct FormArgs {
    #[arg(long)]
    pregnancies: Option<f64>,
    /// Plasma glucose (mg/dL)
    #[arg(long)]
    glucose: Option<f64>,
    /// Diastolic blood pressure (mm Hg)
    #[arg(long)]
    blood_pressure: Option<f64>,
    /// Triceps skin fold thickness (mm)
    #[arg(long)]
    skin_thickness: Option<f64>,
    /// 2-hour serum insulin (mu U/ml)
    #[arg(long)]
    insulin: Option<f64>,
    #[arg(long)]
    bmi: Option<f64>,
    #[arg(long, visible_alias = "dpf")]
    diabetes_pedigree_function: Option<f64>,
    #[arg(long)]
    age: Option<f64>,
}

impl FormArgs {
    fn is_empty(&self) -> bool {
        [
            self.pregnancies,
            self.glucose,
            self.blood_pressure,
            self.skin_thickness,
            self.insulin,
            self.bmi,
            self.diabetes_pedigree_function,
            self.age,
        ]
        .iter()
        .all(Option::is_none)
    }

    fn to_form(&self) -> MedicalForm {
        MedicalForm {
            pregnancies: self.pregnancies.unwrap_or_default(),
            glucose: self.glucose.unwrap_or_default(),
            blood_pressure: self.blood_pressure.unwrap_or_default(),
            skin_thickness: self.skin_thickness.unwrap_or_default(),
            insulin: self.insulin.unwrap_or_default(),
            bmi: self.bmi.unwrap_or_default(),
            diabetes_pedigree_function: self.diabetes_pedigree_function.unwrap_or_default(),
            age: self.age.unwrap_or_default(),
        }
    }
}

impl Measurements {
    /// Parse the comma separated line, or bounds-check the form fields
    fn resolve(&self) -> anyhow::Result<FeatureVector> {
        match &self.values {
            Some(_) if !self.form.is_empty() => {
                anyhow::bail!("Give either comma separated values or field flags, not both")
            }
            Some(line) => Ok(parse_comma_separated(line)?),
            None => Ok(self.form.to_form().validate()?),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Predict from eight comma separated values or field flags
    Predict {
        #[command(flatten)]
        input: Measurements,
        /// Show imputed and standardized values
        #[arg(long)]
        explain: bool,
    },
    /// Store eight values in the history and predict
    SetData {
        #[command(flatten)]
        input: Measurements,
    },
    /// Print every stored record
    History,
    /// Predict every stored record
    Score,
    /// Export the history to a Parquet file
    Export { out: PathBuf },
    /// Describe the expected input fields
    Schema,
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let (message, code) = report(&e);
            eprintln!("{message}");
            ExitCode::from(code)
        }
    }
}

/// Message and exit status for a failed run: 2 for bad user input, 1 for
/// everything else
fn report(error: &anyhow::Error) -> (String, u8) {
    match error.downcast_ref::<RiskError>() {
        Some(risk) if risk.is_user_input() => (user_message(risk), 2),
        _ => (format!("Error: {error:#}"), 1),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = PredictorConfig::from_env();
    if let Some(dir) = cli.artifacts {
        config = config.with_artifact_dir(dir);
    }
    if let Some(path) = cli.history {
        config = config.with_history_path(path);
    }
    debug!("{config}");

    // Nothing is served until every artifact has loaded
    let predictor = RiskPredictor::load(&config).context("Failed to load model artifacts")?;
    let history = HistoryStore::new(config.history_path(), predictor.schema().clone());

    match cli.command {
        Command::Predict { input, explain } => {
            let values = input.resolve()?;
            if explain {
                let trace = predictor.explain(values.values())?;
                print_trace(&trace);
            } else {
                let verdict = predictor.predict(values.values())?;
                println!("{}", verdict.message());
            }
        }
        Command::SetData { input } => {
            let values = input.resolve()?;
            let mut session = Session::new(history);
            session.set_data(values.values())?;
            println!("Your data has been set and stored!");
            println!("{}", predictor.predict(values.values())?.message());
        }
        Command::History => {
            let records = history.read_all()?;
            println!("{}", predictor.schema().header());
            for record in &records {
                println!("{record}");
            }
            info!("{} record(s) in {}", records.len(), history.path().display());
        }
        Command::Score => {
            let start = Instant::now();
            let records = history.read_all()?;
            let rows: Vec<_> = records.iter().map(|r| r.values().to_vec()).collect();
            let results = predictor.predict_batch(&rows);

            let mut positives = 0usize;
            for (record, result) in records.iter().zip(results) {
                match result {
                    Ok(verdict) => {
                        positives += usize::from(verdict == Verdict::Diabetic);
                        println!("{record} => {verdict}");
                    }
                    Err(e) => warn!("Skipping {record}: {e}"),
                }
            }
            info!(
                "Scored {} record(s), {positives} positive, in {:?}",
                records.len(),
                start.elapsed()
            );
        }
        Command::Export { out } => {
            let rows = history.export_parquet(&out)?;
            println!("Exported {rows} record(s) to {}", out.display());
        }
        Command::Schema => print_schema(),
    }

    Ok(())
}

fn user_message(error: &RiskError) -> String {
    match error {
        RiskError::InvalidInputLength { expected, .. } => {
            format!("Error: Please provide exactly {expected} values for prediction.")
        }
        RiskError::MalformedNumericInput { .. } => {
            format!("Error processing comma separated data: {error}")
        }
        other => format!("Error: {other}"),
    }
}

fn print_trace(trace: &PredictionTrace) {
    println!(
        "{:<26} {:>10} {:>10} {:>12}",
        "feature", "raw", "imputed", "standardized"
    );
    for feature in Feature::ALL {
        let marker = if trace.imputed_features.contains(&feature) {
            "*"
        } else {
            " "
        };
        println!(
            "{:<26} {:>10} {:>9}{marker} {:>12.4}",
            feature.name(),
            trace.raw[feature],
            trace.imputed[feature],
            trace.standardized[feature],
        );
    }
    println!("{}", trace.verdict.message());
}

fn print_schema() {
    for feature in Feature::ALL {
        let bounds = feature.bounds();
        let unit = feature.unit().map(|u| format!(" ({u})")).unwrap_or_default();
        let kind = if bounds.integer { "integer" } else { "decimal" };
        let imputed = if feature.is_imputable() {
            ", 0 = not measured"
        } else {
            ""
        };
        println!(
            "{}{unit}: {}; {kind} {}-{}{imputed}",
            feature.name(),
            feature.description(),
            bounds.min,
            bounds.max
        );
    }
}
