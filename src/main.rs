//! Pension Projection CLI
//!
//! Command-line interface for the retirement calculator

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};

use pension_projection::assumptions::{SalaryPeriod, SalaryType};
use pension_projection::history::{CalculationStore, CsvHistoryStore, HistoryFilter, NewCalculation};
use pension_projection::options::write_options_csv;
use pension_projection::{
    Assumptions, CalculatorForm, NormalizedInputs, ProjectionConfig, ProjectionEngine, RetirementEstimate,
    RetirementOption, RetirementOptionsSweeper, SweepConfig,
};

const DEFAULT_STORE_PATH: &str = "pension_history.csv";

#[derive(Parser, Debug)]
#[command(
    name = "pension",
    version,
    about = "Capital-accumulation pension calculator: projection, annuity and retirement options"
)]
struct Cli {
    #[arg(long, global = true, help = "Directory with statutory_parameters.csv (else $PENSION_ASSUMPTIONS_PATH, else built-ins)")]
    assumptions: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project capital to the target age and estimate the monthly pension
    Project(ProjectArgs),
    /// Compare retirement ages side by side
    Sweep(SweepArgs),
    /// List saved calculations
    History(HistoryArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliSalaryType {
    Gross,
    Net,
}

impl From<CliSalaryType> for SalaryType {
    fn from(value: CliSalaryType) -> Self {
        match value {
            CliSalaryType::Gross => SalaryType::Gross,
            CliSalaryType::Net => SalaryType::Net,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliSalaryPeriod {
    Month,
    Year,
}

impl From<CliSalaryPeriod> for SalaryPeriod {
    fn from(value: CliSalaryPeriod) -> Self {
        match value {
            CliSalaryPeriod::Month => SalaryPeriod::Month,
            CliSalaryPeriod::Year => SalaryPeriod::Year,
        }
    }
}

/// Calculator form fields; anything omitted keeps the calculator default
#[derive(Args, Debug)]
struct FormArgs {
    #[arg(long)]
    birth_year: Option<i32>,
    #[arg(long, help = "1-12")]
    birth_month: Option<u32>,
    #[arg(long, help = "Contribution years already behind the initial capital")]
    work_years: Option<i32>,
    #[arg(long)]
    salary: Option<f64>,
    #[arg(long, value_enum)]
    salary_type: Option<CliSalaryType>,
    #[arg(long, value_enum)]
    salary_period: Option<CliSalaryPeriod>,
    #[arg(long)]
    initial_capital: Option<f64>,
    #[arg(long, help = "Share of salary from creative work, percent")]
    copyright_percentage: Option<f64>,
    #[arg(long, help = "Percent of the contribution base paid in each year")]
    contribution_rate: Option<f64>,
    #[arg(long, help = "Annual capital indexation, percent")]
    indexation_rate: Option<f64>,
    #[arg(long)]
    target_age: Option<i32>,
    #[arg(long)]
    life_expectancy_months: Option<f64>,
    #[arg(long)]
    minimal_pension: Option<f64>,
}

impl FormArgs {
    fn to_form(&self) -> CalculatorForm {
        let mut form = CalculatorForm::default();
        if let Some(v) = self.birth_year {
            form.birth_year = v;
        }
        if let Some(v) = self.birth_month {
            form.birth_month = v;
        }
        if let Some(v) = self.work_years {
            form.work_years = v;
        }
        if let Some(v) = self.salary {
            form.salary = v;
        }
        if let Some(v) = self.salary_type {
            form.salary_type = v.into();
        }
        if let Some(v) = self.salary_period {
            form.salary_period = v.into();
        }
        if let Some(v) = self.initial_capital {
            form.initial_capital = v;
        }
        if let Some(v) = self.copyright_percentage {
            form.copyright_percentage = v;
        }
        if let Some(v) = self.contribution_rate {
            form.pension_contribution_rate = v;
        }
        if let Some(v) = self.indexation_rate {
            form.capital_indexation_rate = v;
        }
        if let Some(v) = self.target_age {
            form.target_retirement_age = v;
        }
        if let Some(v) = self.life_expectancy_months {
            form.life_expectancy_months = v;
        }
        if let Some(v) = self.minimal_pension {
            form.minimal_pension = v;
        }
        form
    }
}

#[derive(Args, Debug)]
struct ProjectArgs {
    #[command(flatten)]
    form: FormArgs,

    #[arg(long, help = "Write the trajectory to this CSV file")]
    csv: Option<PathBuf>,

    #[arg(long, help = "Print the whole estimate as JSON instead of tables")]
    json: bool,

    #[arg(long, help = "Save the calculation to the history store")]
    save: bool,

    #[arg(long, default_value = DEFAULT_STORE_PATH)]
    store: PathBuf,

    #[arg(long, default_value = "local")]
    user: String,
}

#[derive(Args, Debug)]
struct SweepArgs {
    #[command(flatten)]
    form: FormArgs,

    #[arg(long)]
    min_age: Option<u32>,

    #[arg(long)]
    max_age: Option<u32>,

    #[arg(long, help = "Write the options table to this CSV file")]
    csv: Option<PathBuf>,

    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct HistoryArgs {
    #[arg(long, default_value = DEFAULT_STORE_PATH)]
    store: PathBuf,

    #[arg(long)]
    user: Option<String>,

    #[arg(long, default_value_t = pension_projection::history::DEFAULT_HISTORY_LIMIT)]
    limit: usize,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let assumptions = Assumptions::resolve(cli.assumptions.as_deref()).context("failed to load assumptions")?;
    let as_of = Local::now().date_naive();

    match cli.command {
        Command::Project(args) => run_project(&args, assumptions, as_of),
        Command::Sweep(args) => run_sweep(&args, assumptions, as_of),
        Command::History(args) => run_history(&args),
    }
}

fn normalize(form: &CalculatorForm, assumptions: &Assumptions, as_of: NaiveDate) -> Result<NormalizedInputs> {
    Ok(form.normalize(as_of, &assumptions.salary)?)
}

fn run_project(args: &ProjectArgs, assumptions: Assumptions, as_of: NaiveDate) -> Result<()> {
    let form = args.form.to_form();
    let normalized = normalize(&form, &assumptions, as_of)?;

    let engine = ProjectionEngine::new(assumptions, ProjectionConfig { start_year: as_of.year() });
    let estimate = engine.estimate(
        &normalized.projection,
        normalized.life_expectancy_months,
        normalized.minimal_pension,
    );

    if let Some(path) = &args.csv {
        let file = File::create(path).with_context(|| format!("unable to create {}", path.display()))?;
        estimate
            .projection
            .write_csv(BufWriter::new(file))
            .with_context(|| format!("unable to write {}", path.display()))?;
        eprintln!("Trajectory written to: {}", path.display());
    }

    if args.json {
        serde_json::to_writer_pretty(io::stdout().lock(), &estimate)?;
        println!();
    } else {
        print_estimate(&normalized, &estimate);
    }

    if args.save {
        let store = CsvHistoryStore::new(&args.store);
        let id = store
            .save(NewCalculation::from_estimate(&args.user, &form, &normalized, &estimate))
            .with_context(|| format!("unable to save to {}", args.store.display()))?;
        eprintln!("Saved calculation #{} to {}", id, args.store.display());
    }

    Ok(())
}

fn print_estimate(normalized: &NormalizedInputs, estimate: &RetirementEstimate) {
    let input = &normalized.projection;
    let summary = estimate.projection.summary();

    println!("Retirement Estimate");
    println!("===================\n");
    println!("  Current age:          {}", normalized.current_age);
    println!("  Target age:           {}", input.target_retirement_age);
    println!("  Annual gross salary:  {:.0}", input.annual_gross_salary);
    println!("  Annual contribution:  {:.2}", estimate.projection.annual_contribution);
    println!();

    println!("{:>6} {:>4} {:>14}", "Year", "Age", "Capital");
    println!("{}", "-".repeat(26));
    for row in &estimate.projection.trajectory {
        println!("{:>6} {:>4} {:>14.0}", row.year, row.age, row.capital);
    }

    println!("\nSummary:");
    println!("  Years simulated:      {}", summary.years_simulated);
    println!("  Starting capital:     {:.0}", summary.starting_capital);
    println!("  Total contributions:  {:.0}", summary.total_contributions);
    println!("  Total indexation:     {:.0}", summary.total_indexation);
    println!("  Final capital:        {:.0}", summary.final_capital);
    println!("  Monthly pension:      {:.0}", estimate.monthly_pension);

    if !estimate.payout_schedule.is_empty() {
        println!("\nIndexed payouts:");
        for payout in &estimate.payout_schedule {
            println!("  Year {:>2}: {:>10.0}", payout.payout_year, payout.monthly_pension);
        }
    }
}

fn run_sweep(args: &SweepArgs, assumptions: Assumptions, as_of: NaiveDate) -> Result<()> {
    let mut form = args.form.to_form();
    if let Some(age) = args.min_age {
        form.min_retirement_age = age;
    }
    if let Some(age) = args.max_age {
        form.max_retirement_age = age;
    }
    let normalized = normalize(&form, &assumptions, as_of)?;

    let sweeper = RetirementOptionsSweeper::new(assumptions, SweepConfig { as_of });
    let options = sweeper.sweep(&normalized.sweep);

    if let Some(path) = &args.csv {
        let file = File::create(path).with_context(|| format!("unable to create {}", path.display()))?;
        write_options_csv(&options, BufWriter::new(file))
            .with_context(|| format!("unable to write {}", path.display()))?;
        eprintln!("Options written to: {}", path.display());
    }

    if args.json {
        serde_json::to_writer_pretty(io::stdout().lock(), &options)?;
        println!();
    } else {
        print_options(&options);
    }
    Ok(())
}

fn print_options(options: &[RetirementOption]) {
    if options.is_empty() {
        println!("No retirement ages left in the requested range.");
        return;
    }

    println!(
        "{:>6} {:>4} {:>6} {:>14} {:>8} {:>12} {:>12}",
        "Year", "Age", "Years", "Capital", "LE (m)", "Pension Y1", "Pension Y5"
    );
    println!("{}", "-".repeat(70));
    for option in options {
        println!(
            "{:>6} {:>4} {:>6} {:>14.0} {:>8.0} {:>12.0} {:>12.0}",
            option.retirement_year,
            option.age_at_retirement,
            option.total_years_of_contribution,
            option.accumulated_capital,
            option.life_expectancy_months,
            option.monthly_pension_year1,
            option.monthly_pension_year5,
        );
    }
}

fn run_history(args: &HistoryArgs) -> Result<()> {
    let store = CsvHistoryStore::new(&args.store);
    let filter = HistoryFilter {
        user_id: args.user.clone(),
        limit: Some(args.limit),
    };
    let records = store
        .list(&filter)
        .with_context(|| format!("unable to read {}", args.store.display()))?;

    if records.is_empty() {
        println!("No saved calculations in {}", args.store.display());
        return Ok(());
    }

    println!(
        "{:>4} {:<20} {:<12} {:>4} {:>4} {:>12} {:>10}",
        "Id", "Saved", "User", "Age", "Ret", "Salary", "Pension"
    );
    println!("{}", "-".repeat(72));
    for record in &records {
        println!(
            "{:>4} {:<20} {:<12} {:>4} {:>4} {:>12.0} {:>10.0}",
            record.id,
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.user_id,
            record.current_age,
            record.target_retirement_age,
            record.annual_gross_salary,
            record.calculated_monthly_pension,
        );
    }
    Ok(())
}
