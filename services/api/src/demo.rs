use crate::infra::parse_answer;
use chrono::Utc;
use clap::Args;
use realty_analytics::analysis::investment::{
    analyze, export::write_projection_csv, DownPayment, InvestmentReport, InvestmentRequest,
    MarketBenchmarks, OperatingExpenses, ScenarioBook, ScenarioComparison, ScenarioId,
    ScenarioPolicy,
};
use realty_analytics::analysis::readiness::{
    CategoryId, RawInput, ReadinessEngine, SellerReadinessResult,
};
use realty_analytics::config::{AppConfig, ReadinessSource};
use realty_analytics::error::AppError;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct ProjectArgs {
    /// Purchase price in dollars
    #[arg(long)]
    pub(crate) purchase_price: f64,
    /// Down payment as a share of the price (0.20 = 20%)
    #[arg(long, default_value_t = 0.20, conflicts_with = "down_payment_amount")]
    pub(crate) down_payment_percent: f64,
    /// Down payment as a dollar amount
    #[arg(long)]
    pub(crate) down_payment_amount: Option<f64>,
    /// Annual mortgage interest rate (0.07 = 7%)
    #[arg(long, default_value_t = 0.07)]
    pub(crate) interest_rate: f64,
    /// Loan term in years
    #[arg(long, default_value_t = 30)]
    pub(crate) loan_term_years: u32,
    /// Expected monthly rent in dollars
    #[arg(long)]
    pub(crate) monthly_rent: f64,
    /// Vacancy rate; defaults to the configured market benchmark
    #[arg(long)]
    pub(crate) vacancy_rate: Option<f64>,
    #[command(flatten)]
    pub(crate) expenses: ExpenseArgs,
    /// Annual appreciation rate; defaults to the configured market benchmark
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) appreciation_rate: Option<f64>,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) closing_costs: f64,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) rehab_budget: f64,
    /// Number of years to project
    #[arg(long, default_value_t = 5)]
    pub(crate) holding_period_years: u32,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub(crate) rent_growth_rate: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub(crate) expense_growth_rate: f64,
    /// Write the yearly projection to a CSV file
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Print the full report as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

/// Exactly one operating expense model.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub(crate) struct ExpenseArgs {
    /// Operating expenses as a share of effective gross income
    #[arg(long)]
    pub(crate) expense_rate: Option<f64>,
    /// Flat monthly operating expenses in dollars
    #[arg(long)]
    pub(crate) monthly_expenses: Option<f64>,
}

impl ExpenseArgs {
    fn model(&self) -> OperatingExpenses {
        match (self.expense_rate, self.monthly_expenses) {
            (Some(rate), _) => OperatingExpenses::Rate { rate },
            (None, Some(amount)) => OperatingExpenses::Monthly { amount },
            (None, None) => OperatingExpenses::Monthly { amount: 0.0 },
        }
    }
}

impl ProjectArgs {
    fn request(&self) -> InvestmentRequest {
        let down_payment = match self.down_payment_amount {
            Some(amount) => DownPayment::Amount(amount),
            None => DownPayment::Percent(self.down_payment_percent),
        };

        InvestmentRequest {
            purchase_price: self.purchase_price,
            down_payment,
            annual_interest_rate: self.interest_rate,
            loan_term_years: self.loan_term_years,
            monthly_rent: self.monthly_rent,
            vacancy_rate: self.vacancy_rate,
            operating_expenses: self.expenses.model(),
            appreciation_rate: self.appreciation_rate,
            closing_costs: self.closing_costs,
            rehab_budget: self.rehab_budget,
            holding_period_years: self.holding_period_years,
            rent_growth_rate: self.rent_growth_rate,
            expense_growth_rate: self.expense_growth_rate,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Answer for one category as CATEGORY=VALUE (repeatable)
    #[arg(long = "answer", value_parser = parse_answer)]
    pub(crate) answers: Vec<(CategoryId, RawInput)>,
    /// Score against this rubric file instead of the configured one
    #[arg(long)]
    pub(crate) rubric: Option<PathBuf>,
    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Write the baseline projection to a CSV file
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Skip the seller readiness portion of the demo
    #[arg(long)]
    pub(crate) skip_readiness: bool,
}

pub(crate) fn run_investment_projection(args: ProjectArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let inputs = args.request().resolve(&config.market);
    let report = analyze(&inputs)?;

    if let Some(path) = &args.csv {
        export_csv(path, &report)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_investment_report(&report);
    }
    if let Some(path) = &args.csv {
        println!("\nProjection written to {}", path.display());
    }

    Ok(())
}

pub(crate) fn run_readiness_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let rubric = match args.rubric {
        Some(path) => ReadinessSource::File(path).load()?,
        None => config.readiness.load()?,
    };
    let engine = ReadinessEngine::new(rubric)?;

    let answers: BTreeMap<CategoryId, RawInput> = args.answers.into_iter().collect();
    let result = engine.compute_score_as_of(&answers, Utc::now())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        render_readiness_result(&result);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        csv,
        skip_readiness,
    } = args;

    println!("Realty analytics demo");
    let baseline = demo_request().resolve(&MarketBenchmarks::default());
    let baseline_report = analyze(&baseline)?;

    println!("\nBaseline: $250,000 single-family rental, 20% down at 7%");
    render_investment_report(&baseline_report);

    let mut stretched = baseline.clone();
    stretched.down_payment = DownPayment::Percent(0.25);
    stretched.rent_growth_rate = 0.02;
    let stretched_report = analyze(&stretched)?;

    let mut book = ScenarioBook::new(ScenarioPolicy::default());
    let saved_at = Utc::now();
    for (label, report) in [
        ("Baseline 20% down", baseline_report.clone()),
        ("25% down, 2% rent growth", stretched_report),
    ] {
        book.save(label, report.inputs, report.metrics, report.years, saved_at)?;
    }
    if let Err(err) = book.save(
        "baseline 20% DOWN",
        baseline_report.inputs.clone(),
        baseline_report.metrics,
        baseline_report.years.clone(),
        saved_at,
    ) {
        println!("\nDuplicate save rejected: {err}");
    }

    println!("\nScenario comparison");
    render_comparison(&book.compare());

    if let Some(path) = &csv {
        export_csv(path, &baseline_report)?;
        println!("\nBaseline projection written to {}", path.display());
    }

    if skip_readiness {
        return Ok(());
    }

    println!("\nSeller readiness sample");
    let engine = ReadinessEngine::standard()?;
    let result = engine.compute_score_as_of(&demo_answers(), saved_at)?;
    render_readiness_result(&result);

    Ok(())
}

fn demo_request() -> InvestmentRequest {
    InvestmentRequest {
        purchase_price: 250_000.0,
        down_payment: DownPayment::Percent(0.20),
        annual_interest_rate: 0.07,
        loan_term_years: 30,
        monthly_rent: 2_000.0,
        vacancy_rate: None,
        operating_expenses: OperatingExpenses::Monthly { amount: 600.0 },
        appreciation_rate: None,
        closing_costs: 0.0,
        rehab_budget: 0.0,
        holding_period_years: 5,
        rent_growth_rate: 0.0,
        expense_growth_rate: 0.0,
    }
}

fn demo_answers() -> BTreeMap<CategoryId, RawInput> {
    [
        ("property_condition", RawInput::Choice("minor_repairs".to_string())),
        ("estimated_repairs", RawInput::Number(12_000.0)),
        ("market_timing", RawInput::Choice("balanced".to_string())),
        ("emotional_readiness", RawInput::Number(7.0)),
        ("mortgage_payoff", RawInput::Choice("low_equity".to_string())),
        ("move_timeline", RawInput::Choice("within_6_months".to_string())),
    ]
    .into_iter()
    .map(|(id, input)| (CategoryId::new(id), input))
    .collect()
}

fn export_csv(path: &Path, report: &InvestmentReport) -> Result<(), AppError> {
    let file = File::create(path)?;
    write_projection_csv(BufWriter::new(file), &report.years)?;
    Ok(())
}

pub(crate) fn render_investment_report(report: &InvestmentReport) {
    let metrics = &report.metrics;
    println!(
        "- Cash invested ${:.2} | loan ${:.2} | monthly payment ${:.2}",
        metrics.initial_cash_invested, metrics.loan_amount, metrics.monthly_payment
    );
    println!(
        "- Year 1 NOI ${:.2} | cash flow ${:.2} | cap rate {}",
        metrics.first_year_noi,
        metrics.first_year_cash_flow,
        percent(Some(metrics.cap_rate))
    );
    println!(
        "- Cash-on-cash {} | DSCR {} | GRM {}",
        percent(metrics.cash_on_cash_return),
        ratio(metrics.debt_service_coverage),
        ratio(metrics.gross_rent_multiplier)
    );
    println!(
        "- Year {} equity ${:.2} | cumulative cash flow ${:.2} | total return {} ({} annualized)",
        metrics.final_year,
        metrics.final_equity,
        metrics.cumulative_cash_flow,
        percent(metrics.total_return),
        percent(metrics.annualized_return)
    );

    println!("Year | Value | Balance | Equity | NOI | Debt service | Cash flow | Cumulative");
    for view in report.year_views() {
        println!(
            "{:>4} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2}",
            view.year,
            view.property_value,
            view.loan_balance,
            view.equity,
            view.net_operating_income,
            view.debt_service,
            view.net_cash_flow,
            view.cumulative_cash_flow
        );
    }
}

fn render_comparison(comparison: &ScenarioComparison) {
    for row in &comparison.rows {
        println!(
            "- [{}] {}: cap rate {} | cash-on-cash {} | total return {} | equity ${:.2}",
            row.id,
            row.label,
            percent(Some(row.cap_rate)),
            percent(row.cash_on_cash_return),
            percent(row.total_return),
            row.final_equity
        );
    }
    let leader = |id: &Option<ScenarioId>| match id {
        Some(id) => format!("{id}"),
        None => "n/a".to_string(),
    };
    println!(
        "Best cap rate: {} | best cash-on-cash: {} | best total return: {}",
        leader(&comparison.best_cap_rate),
        leader(&comparison.best_cash_on_cash),
        leader(&comparison.best_total_return)
    );
}

pub(crate) fn render_readiness_result(result: &SellerReadinessResult) {
    println!(
        "Overall {} / 100 -> grade {} ({}) [{}]",
        result.overall_score,
        result.grade,
        result.grade_label,
        result.color_band.label()
    );
    for category in &result.categories {
        println!(
            "  - {}: {} (weight {:.2}) {}",
            category.name, category.score, category.weight, category.interpretation
        );
    }
    if !result.focus_areas.is_empty() {
        let focus: Vec<&str> = result.focus_areas.iter().map(CategoryId::as_str).collect();
        println!("Focus first on: {}", focus.join(", "));
    }
}

fn percent(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{:.2}%", value * 100.0),
        None => "n/a".to_string(),
    }
}

fn ratio(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.2}"),
        None => "n/a".to_string(),
    }
}
