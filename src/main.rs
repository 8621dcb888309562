//! fitness-tracker - command-line client for the fitness API

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};

use fitness_tracker::calendar::shift_month;
use fitness_tracker::commands::{self, AppState};
use fitness_tracker::display;
use fitness_tracker::form::{PlannedWorkoutForm, ProfileForm, WorkoutForm};
use fitness_tracker::met::MetTable;
use fitness_tracker::ApiConfig;

#[derive(Parser, Debug)]
#[command(name = "fitness-tracker", author, version, about, long_about = None)]
struct Cli {
  /// API base URL (overrides FITNESS_API_BASE)
  #[arg(long, global = true, value_name = "URL")]
  api_base: Option<String>,

  /// Bearer token from the identity provider (overrides FITNESS_API_TOKEN)
  #[arg(long, global = true, value_name = "TOKEN")]
  token: Option<String>,

  /// Debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Answer yes to confirmation prompts
  #[arg(short, long, global = true)]
  yes: bool,

  /// Print results as JSON
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Logged workouts
  #[command(subcommand)]
  Workouts(WorkoutsCommand),

  /// Planned workouts, calendar and weekly goal
  #[command(subcommand)]
  Plan(PlanCommand),

  /// Your profile
  #[command(subcommand)]
  Profile(ProfileCommand),

  /// Streaks, weekly comparison and consistency stats
  Insights {
    /// Only the short summary message
    #[arg(long)]
    summary: bool,
  },

  /// Estimate calories offline
  Estimate {
    #[arg(long = "type", value_name = "TYPE")]
    workout_type: Option<String>,
    /// Minutes
    #[arg(long)]
    duration: Option<f64>,
    /// Body weight in pounds
    #[arg(long)]
    weight: Option<f64>,
    /// List known workout types
    #[arg(long)]
    list_types: bool,
  },
}

#[derive(Subcommand, Debug)]
enum WorkoutsCommand {
  List,
  Log {
    #[arg(long = "type", value_name = "TYPE")]
    workout_type: String,
    /// Minutes
    #[arg(long)]
    duration: String,
    /// Defaults to an estimate from your profile weight
    #[arg(long)]
    calories: Option<String>,
  },
  Delete {
    id: String,
  },
}

#[derive(Args, Debug, Default)]
struct PlanFields {
  #[arg(long = "type", value_name = "TYPE")]
  workout_type: Option<String>,
  /// YYYY-MM-DD
  #[arg(long)]
  date: Option<String>,
  /// HH:MM, empty to clear
  #[arg(long)]
  time: Option<String>,
  /// Minutes
  #[arg(long)]
  duration: Option<String>,
  #[arg(long)]
  notes: Option<String>,
}

impl PlanFields {
  fn apply(self, form: &mut PlannedWorkoutForm) {
    let PlanFields {
      workout_type,
      date,
      time,
      duration,
      notes,
    } = self;
    if let Some(v) = workout_type {
      form.workout_type = v;
    }
    if let Some(v) = date {
      form.planned_date = v;
    }
    if let Some(v) = time {
      form.planned_time = v;
    }
    if let Some(v) = duration {
      form.planned_duration = v;
    }
    if let Some(v) = notes {
      form.notes = v;
    }
  }
}

#[derive(Subcommand, Debug)]
enum PlanCommand {
  List,
  Add(PlanFields),
  Edit {
    id: String,
    #[command(flatten)]
    fields: PlanFields,
  },
  Delete {
    id: String,
  },
  /// Month grid of planned workouts
  Calendar {
    /// YYYY-MM, defaults to this month
    #[arg(long)]
    month: Option<String>,
    /// Months to move from --month, e.g. -1 or 1
    #[arg(long, allow_hyphen_values = true, default_value_t = 0)]
    offset: i32,
  },
  /// This week's progress toward your weekly target
  Progress {
    /// Count logged workouts instead of planned ones
    #[arg(long)]
    logged: bool,
  },
  /// Past planned workouts that were never logged
  Missed,
  /// Log a missed planned workout as done
  LogMissed {
    id: String,
  },
  /// Remove a missed planned workout
  Dismiss {
    id: String,
  },
}

#[derive(Args, Debug, Default)]
struct ProfileFields {
  #[arg(long)]
  height_feet: Option<String>,
  #[arg(long)]
  height_inches: Option<String>,
  /// Pounds
  #[arg(long)]
  weight: Option<String>,
  #[arg(long)]
  age: Option<String>,
  #[arg(long)]
  sex: Option<String>,
  #[arg(long)]
  goal: Option<String>,
  /// Pounds
  #[arg(long)]
  target_weight: Option<String>,
  /// workouts or duration
  #[arg(long)]
  target_type: Option<String>,
  #[arg(long)]
  target_value: Option<String>,
  /// YYYY-MM-DD
  #[arg(long)]
  deadline: Option<String>,
  /// Days per week, 0 to 7
  #[arg(long)]
  frequency: Option<String>,
  #[arg(long)]
  activity_level: Option<String>,
  #[arg(long)]
  gym_experience: Option<String>,
}

impl ProfileFields {
  fn apply(self, form: &mut ProfileForm) {
    let pairs = [
      (self.height_feet, &mut form.height_feet),
      (self.height_inches, &mut form.height_inches),
      (self.weight, &mut form.current_weight),
      (self.age, &mut form.age),
      (self.sex, &mut form.sex),
      (self.goal, &mut form.goals),
      (self.target_weight, &mut form.target_weight),
      (self.target_type, &mut form.weekly_target_type),
      (self.target_value, &mut form.weekly_target_value),
      (self.deadline, &mut form.goal_deadline),
      (self.frequency, &mut form.workout_frequency),
      (self.activity_level, &mut form.activity_level),
      (self.gym_experience, &mut form.gym_experience),
    ];
    for (value, field) in pairs {
      if let Some(value) = value {
        *field = value;
      }
    }
  }
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
  Show,
  Set(ProfileFields),
}

/// ---------------------------------------------------------------------------
/// Entry Point
/// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
  dotenvy::dotenv().ok();
  let cli = Cli::parse();

  let level = if cli.verbose { "debug" } else { "warn" };
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

  tokio::select! {
    result = run(cli) => result,
    _ = tokio::signal::ctrl_c() => {
      log::warn!("Interrupted, pending requests dropped");
      bail!("Cancelled")
    }
  }
}

async fn run(cli: Cli) -> Result<()> {
  if let Command::Estimate {
    workout_type,
    duration,
    weight,
    list_types,
  } = &cli.command
  {
    return estimate(workout_type.as_deref(), *duration, *weight, *list_types);
  }

  let config = load_config(&cli)?;
  let mut state = AppState::new(&config)?;
  let today = Local::now().date_naive();
  let now = Local::now().naive_local();
  let json = cli.json;
  let assume_yes = cli.yes;
  let confirm = move |prompt: &str| assume_yes || ask(prompt);

  match cli.command {
    Command::Workouts(cmd) => match cmd {
      WorkoutsCommand::List => {
        let workouts = commands::workouts::list_workouts(&mut state).await?;
        print_list(json, &workouts, display::workout_line, "No workouts logged yet")?;
      }
      WorkoutsCommand::Log {
        workout_type,
        duration,
        calories,
      } => {
        let weight = state.require_dashboard().await?.current_weight;
        let mut form = WorkoutForm::new();
        form.set_type(&workout_type, weight, &state.mets);
        form.set_duration(&duration, weight, &state.mets);
        if let Some(calories) = calories {
          form.set_calories(&calories);
        }
        let workouts = commands::workouts::log_workout(&mut state, &form).await?;
        println!("Workout logged");
        print_list(json, &workouts, display::workout_line, "No workouts logged yet")?;
      }
      WorkoutsCommand::Delete { id } => {
        let workouts = commands::workouts::delete_workout(&mut state, &id).await?;
        println!("Workout deleted");
        print_list(json, &workouts, display::workout_line, "No workouts logged yet")?;
      }
    },

    Command::Plan(cmd) => match cmd {
      PlanCommand::List => {
        let planned = commands::planned::list_planned(&mut state).await?;
        print_list(json, &planned, plan_with_id, "No planned workouts")?;
      }
      PlanCommand::Add(fields) => {
        let mut form = PlannedWorkoutForm::default();
        fields.apply(&mut form);
        let planned = commands::planned::schedule(&mut state, &form, today).await?;
        println!("Workout scheduled");
        print_list(json, &planned, plan_with_id, "No planned workouts")?;
      }
      PlanCommand::Edit { id, fields } => {
        let mut form = commands::planned::edit_form(&mut state, &id).await?;
        fields.apply(&mut form);
        let planned = commands::planned::edit(&mut state, &id, &form, today).await?;
        println!("Planned workout updated");
        print_list(json, &planned, plan_with_id, "No planned workouts")?;
      }
      PlanCommand::Delete { id } => {
        if commands::planned::delete(&mut state, &id, &confirm).await? {
          println!("Planned workout deleted");
        }
      }
      PlanCommand::Calendar { month, offset } => {
        let anchor = match month {
          Some(raw) => parse_month(&raw)?,
          None => today,
        };
        let grid = commands::planned::calendar(&mut state, shift_month(anchor, offset), today).await?;
        if json {
          println!("{}", serde_json::to_string_pretty(&grid)?);
        } else {
          println!("{}", display::render_calendar(&grid));
        }
      }
      PlanCommand::Progress { logged } => {
        let progress = if logged {
          commands::workouts::logged_progress(&mut state, today).await?
        } else {
          commands::planned::progress(&mut state, today).await?
        };
        print_progress(json, progress)?;
      }
      PlanCommand::Missed => {
        let missed = commands::planned::missed(&mut state, now).await?;
        print_list(json, &missed, plan_with_id, "No missed workouts")?;
      }
      PlanCommand::LogMissed { id } => {
        let workout_id = commands::planned::log_missed(&mut state, &id, now).await?;
        println!("Workout logged ({}) and plan marked completed", workout_id);
      }
      PlanCommand::Dismiss { id } => {
        if commands::planned::dismiss_missed(&mut state, &id, &confirm).await? {
          println!("Planned workout dismissed");
        }
      }
    },

    Command::Profile(cmd) => {
      let status = match cmd {
        ProfileCommand::Show => commands::profile::show_profile(&mut state).await?,
        ProfileCommand::Set(fields) => {
          let mut form = commands::profile::edit_form(&mut state).await?;
          fields.apply(&mut form);
          let status = commands::profile::save_profile(&mut state, &form).await?;
          println!("Profile saved");
          status
        }
      };
      if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
      } else {
        print_profile(status.profile.as_ref(), status.is_complete);
      }
    }

    Command::Insights { summary } => {
      if summary {
        let insights = commands::insights::summary(&mut state).await?;
        match (json, insights.message) {
          (true, message) => println!("{}", serde_json::json!({ "message": message })),
          (false, Some(message)) => println!("{}", message),
          (false, None) => println!("No insights yet"),
        }
      } else {
        let (insights, profile) = commands::insights::comprehensive(&mut state).await?;
        if json {
          println!("{}", serde_json::to_string_pretty(&insights)?);
        } else {
          println!("{}", display::render_insights(&insights, Some(&profile)));
        }
      }
    }

    Command::Estimate { .. } => {}
  }

  Ok(())
}

/// ---------------------------------------------------------------------------
/// Helpers
/// ---------------------------------------------------------------------------

fn load_config(cli: &Cli) -> Result<ApiConfig> {
  ApiConfig::from_env_with(cli.api_base.as_deref(), cli.token.clone())
    .context("Set FITNESS_API_BASE or pass --api-base")
}

fn estimate(workout_type: Option<&str>, duration: Option<f64>, weight: Option<f64>, list_types: bool) -> Result<()> {
  let mets = MetTable::standard();
  if list_types {
    for t in mets.workout_types() {
      println!("{}", display::capitalize(t));
    }
    println!("Anything else uses MET {}", mets.default_met());
    return Ok(());
  }

  let workout_type = workout_type.context("--type is required")?;
  match mets.estimate_calories(workout_type, duration, weight) {
    Some(calories) => println!(
      "{} for {} min: ~{} cal (MET {})",
      display::capitalize(workout_type),
      duration.unwrap_or_default(),
      calories,
      mets.lookup(workout_type)
    ),
    None => bail!("Need a duration (minutes) and a positive body weight (lbs) to estimate"),
  }
  Ok(())
}

fn print_progress(json: bool, progress: Option<fitness_tracker::progress::WeeklyProgress>) -> Result<()> {
  match progress {
    Some(progress) if json => println!("{}", serde_json::to_string_pretty(&progress)?),
    Some(progress) => println!("This week: {}", display::progress_bar(&progress)),
    None => println!("No weekly target set. Use `profile set --target-value`."),
  }
  Ok(())
}

fn parse_month(raw: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
    .with_context(|| format!("Month must be YYYY-MM, got {:?}", raw))
}

fn plan_with_id(plan: &fitness_tracker::models::PlannedWorkout) -> String {
  format!("[{}] {}", plan.id, display::planned_line(plan))
}

fn print_list<T: serde::Serialize>(json: bool, items: &[T], line: fn(&T) -> String, empty: &str) -> Result<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(items)?);
  } else if items.is_empty() {
    println!("{}", empty);
  } else {
    for item in items {
      println!("{}", line(item));
    }
  }
  Ok(())
}

fn print_profile(profile: Option<&fitness_tracker::models::Profile>, complete: bool) {
  let Some(p) = profile else {
    println!("No profile yet. Use `profile set` to create one.");
    return;
  };
  let show = |label: &str, value: Option<String>| {
    if let Some(value) = value {
      println!("{:<16} {}", label, value);
    }
  };
  show(
    "Height",
    p.height_feet
      .map(|ft| format!("{}' {}\"", ft, p.height_inches.unwrap_or(0))),
  );
  show("Weight", p.current_weight.map(|w| format!("{} lbs", w)));
  show("Age", p.age.map(|a| a.to_string()));
  show("Sex", p.sex.clone());
  show("Goal", p.goals.clone());
  show("Target weight", p.target_weight.map(|w| format!("{} lbs", w)));
  show(
    "Weekly target",
    p.weekly_target()
      .map(|(kind, value)| format!("{} {}", value, kind.as_str())),
  );
  show("Goal deadline", p.goal_deadline.map(|d| d.to_string()));
  show("Frequency", p.workout_frequency.map(|f| format!("{} days/week", f)));
  show("Activity level", p.activity_level.clone());
  show("Gym experience", p.gym_experience.clone());
  show("Progress", display::weight_to_go(p));
  if !complete {
    println!("Profile incomplete: height, weight and age unlock the dashboard.");
  }
}

/// y/N prompt on stdin
fn ask(prompt: &str) -> bool {
  print!("{} [y/N] ", prompt);
  if io::stdout().flush().is_err() {
    return false;
  }
  let mut answer = String::new();
  match io::stdin().lock().read_line(&mut answer) {
    Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
    Err(_) => false,
  }
}
