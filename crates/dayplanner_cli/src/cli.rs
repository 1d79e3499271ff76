//! Command definitions and handlers.
//!
//! # Responsibility
//! - Map each subcommand onto one store operation (or a read).
//! - Render plain-text output; never log task text or notes.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use dayplanner_core::service::calendar::{close_day, open_day, WEEKDAY_HEADERS};
use dayplanner_core::service::checklist::{commit_task_edit, submit_new_task};
use dayplanner_core::{
    month_view, toggle_mood, DateKey, DayData, DaySummary, IconCategory, Mood, MonthCursor,
    PlannerStore, SnapshotRepository,
};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dayplanner")]
#[command(about = "Personal day planner: tasks, water, mood and notes per day")]
#[command(version)]
pub struct Cli {
    /// SQLite database path (overrides DAYPLANNER_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Directory for rolling log files (overrides DAYPLANNER_LOG_DIR)
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error (overrides DAYPLANNER_LOG_LEVEL)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Show one day (creates the record on first view)
    Show {
        /// Day as YYYY-MM-DD, default today
        #[arg(long)]
        date: Option<String>,
    },
    /// Add a task
    Add {
        text: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// Toggle task completion
    Toggle {
        task_id: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a task
    Delete {
        task_id: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// Toggle whether a task shows in the month grid
    Visibility {
        task_id: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// Set a task icon
    Icon {
        task_id: String,
        icon: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// Replace task text
    Edit {
        task_id: String,
        text: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// Water intake counter
    Water {
        #[command(subcommand)]
        action: WaterAction,
    },
    /// Set the mood; omit the name to clear it
    Mood {
        mood: Option<String>,
        /// Clear the mood when it already equals the given one
        #[arg(long)]
        toggle: bool,
        #[arg(long)]
        date: Option<String>,
    },
    /// Replace the notes; an empty string clears them
    Notes {
        text: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// Print the month grid with day indicators
    Month {
        /// Month as YYYY-MM, default current month
        month: Option<String>,
    },
    /// List the task icon catalog
    Icons {
        /// Only this category
        category: Option<String>,
    },
    /// Select a day and open its detail panel
    Select { date: String },
    /// Close the detail panel
    Close,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum WaterAction {
    /// Set the count; negative values are stored as zero
    Set {
        #[arg(allow_negative_numbers = true)]
        count: i64,
        #[arg(long)]
        date: Option<String>,
    },
    /// Add one glass
    Inc {
        #[arg(long)]
        date: Option<String>,
    },
    /// Remove one glass, holding at zero
    Dec {
        #[arg(long)]
        date: Option<String>,
    },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Show { .. } => "show",
            Self::Add { .. } => "add",
            Self::Toggle { .. } => "toggle",
            Self::Delete { .. } => "delete",
            Self::Visibility { .. } => "visibility",
            Self::Icon { .. } => "icon",
            Self::Edit { .. } => "edit",
            Self::Water { .. } => "water",
            Self::Mood { .. } => "mood",
            Self::Notes { .. } => "notes",
            Self::Month { .. } => "month",
            Self::Icons { .. } => "icons",
            Self::Select { .. } => "select",
            Self::Close => "close",
        }
    }
}

/// Runs one command against `store`, writing output to `out`.
pub fn execute<R: SnapshotRepository>(
    command: Commands,
    store: &mut PlannerStore<R>,
    out: &mut impl Write,
    today: DateKey,
) -> Result<()> {
    match command {
        Commands::Show { date } => {
            let date = resolve_date(date.as_deref(), today)?;
            let day = store.get_or_migrate(date)?;
            render_day(out, &day)?;
        }
        Commands::Add { text, date } => {
            let date = resolve_date(date.as_deref(), today)?;
            match submit_new_task(store, date, &text)? {
                Some(task_id) => writeln!(out, "Task added (ID: {task_id})")?,
                None => bail!("task text must not be blank"),
            }
        }
        Commands::Toggle { task_id, date } => {
            let date = resolve_date(date.as_deref(), today)?;
            require_task(store, date, &task_id)?;
            store.toggle_task(date, &task_id)?;
            writeln!(out, "Task toggled")?;
        }
        Commands::Delete { task_id, date } => {
            let date = resolve_date(date.as_deref(), today)?;
            require_task(store, date, &task_id)?;
            store.delete_task(date, &task_id)?;
            writeln!(out, "Task deleted")?;
        }
        Commands::Visibility { task_id, date } => {
            let date = resolve_date(date.as_deref(), today)?;
            require_task(store, date, &task_id)?;
            store.toggle_task_calendar_visibility(date, &task_id)?;
            let shown = store
                .peek(date)
                .task(&task_id)
                .is_some_and(|task| task.show_in_calendar);
            writeln!(
                out,
                "Task {} the calendar",
                if shown { "shown in" } else { "hidden from" }
            )?;
        }
        Commands::Icon {
            task_id,
            icon,
            date,
        } => {
            let date = resolve_date(date.as_deref(), today)?;
            require_task(store, date, &task_id)?;
            store.set_task_icon(date, &task_id, icon)?;
            writeln!(out, "Task icon set")?;
        }
        Commands::Edit {
            task_id,
            text,
            date,
        } => {
            let date = resolve_date(date.as_deref(), today)?;
            require_task(store, date, &task_id)?;
            if commit_task_edit(store, date, &task_id, &text)? {
                writeln!(out, "Task updated")?;
            } else {
                writeln!(out, "Blank edit discarded")?;
            }
        }
        Commands::Water { action } => {
            let date = match action {
                WaterAction::Set { count, date } => {
                    let date = resolve_date(date.as_deref(), today)?;
                    store.set_water_count(date, count)?;
                    date
                }
                WaterAction::Inc { date } => {
                    let date = resolve_date(date.as_deref(), today)?;
                    store.increment_water(date)?;
                    date
                }
                WaterAction::Dec { date } => {
                    let date = resolve_date(date.as_deref(), today)?;
                    store.decrement_water(date)?;
                    date
                }
            };
            let summary = DaySummary::of(&store.peek(date));
            writeln!(
                out,
                "Water: {}/{} glasses",
                summary.water.count, summary.water.goal
            )?;
        }
        Commands::Mood { mood, toggle, date } => {
            let date = resolve_date(date.as_deref(), today)?;
            let requested = mood.as_deref().map(parse_mood).transpose()?;
            let next = match (requested, toggle) {
                (Some(clicked), true) => toggle_mood(store.peek(date).mood, clicked),
                (requested, _) => requested,
            };
            store.set_mood(date, next)?;
            match next {
                Some(mood) => writeln!(out, "Mood: {} {}", mood.emoji(), mood.label())?,
                None => writeln!(out, "Mood cleared")?,
            }
        }
        Commands::Notes { text, date } => {
            let date = resolve_date(date.as_deref(), today)?;
            store.set_notes(date, text)?;
            let summary = DaySummary::of(&store.peek(date));
            writeln!(
                out,
                "Notes saved ({} words, {} chars)",
                summary.notes.words, summary.notes.chars
            )?;
        }
        Commands::Month { month } => {
            let cursor = match month.as_deref() {
                Some(raw) => parse_month(raw)?,
                None => MonthCursor::of(today),
            };
            render_month(out, store, cursor, today)?;
        }
        Commands::Icons { category } => {
            let categories = match category.as_deref() {
                Some(raw) => vec![IconCategory::parse(raw)
                    .ok_or_else(|| anyhow!("unknown icon category `{raw}`"))?],
                None => IconCategory::ALL.to_vec(),
            };
            for category in categories {
                writeln!(out, "{:<8} {}", category.name(), category.icons().join(" "))?;
            }
        }
        Commands::Select { date } => {
            let date = resolve_date(Some(&date), today)?;
            open_day(store, MonthCursor::of(date), date)?;
            writeln!(out, "Selected {date}")?;
        }
        Commands::Close => {
            close_day(store)?;
            writeln!(out, "Detail panel closed")?;
        }
    }
    Ok(())
}

fn resolve_date(raw: Option<&str>, today: DateKey) -> Result<DateKey> {
    match raw {
        Some(raw) => DateKey::parse(raw.trim()).context("invalid date"),
        None => Ok(today),
    }
}

fn parse_month(raw: &str) -> Result<MonthCursor> {
    let (year, month) = raw
        .trim()
        .split_once('-')
        .ok_or_else(|| anyhow!("month must be YYYY-MM, got `{raw}`"))?;
    let year: i32 = year.parse().with_context(|| format!("invalid year in `{raw}`"))?;
    let month: u32 = month
        .parse()
        .with_context(|| format!("invalid month in `{raw}`"))?;
    MonthCursor::new(year, month).ok_or_else(|| anyhow!("month out of range: `{raw}`"))
}

fn parse_mood(raw: &str) -> Result<Mood> {
    Mood::parse(raw).ok_or_else(|| {
        let known: Vec<_> = Mood::ALL.iter().map(|mood| mood.as_str()).collect();
        anyhow!("unknown mood `{raw}` (expected one of {})", known.join("|"))
    })
}

/// The store treats unknown ids as no-ops; the CLI reports them instead.
fn require_task<R: SnapshotRepository>(
    store: &PlannerStore<R>,
    date: DateKey,
    task_id: &str,
) -> Result<()> {
    if store.peek(date).task(task_id).is_none() {
        bail!("no task `{task_id}` on {date}");
    }
    Ok(())
}

fn render_day(out: &mut impl Write, day: &DayData) -> Result<()> {
    let summary = DaySummary::of(day);
    writeln!(out, "{}", day.date)?;
    writeln!(
        out,
        "Tasks: {}/{} done ({}%)",
        summary.tasks.completed,
        summary.tasks.total,
        summary.tasks.percent()
    )?;
    for task in &day.tasks {
        writeln!(
            out,
            "  [{}] {} {}{}  ({})",
            if task.completed { "x" } else { " " },
            task.icon,
            task.text,
            if task.show_in_calendar { "" } else { " (hidden)" },
            task.id
        )?;
    }
    writeln!(
        out,
        "Water: {}/{} glasses ({}%)",
        summary.water.count,
        summary.water.goal,
        summary.water.percent()
    )?;
    match summary.mood {
        Some(mood) => writeln!(out, "Mood: {} {}", mood.emoji(), mood.label())?,
        None => writeln!(out, "Mood: -")?,
    }
    if summary.has_notes {
        writeln!(out, "Notes ({} words):", summary.notes.words)?;
        for line in day.notes.lines() {
            writeln!(out, "  {line}")?;
        }
    } else {
        writeln!(out, "Notes: -")?;
    }
    Ok(())
}

fn render_month<R: SnapshotRepository>(
    out: &mut impl Write,
    store: &PlannerStore<R>,
    cursor: MonthCursor,
    today: DateKey,
) -> Result<()> {
    let cells = month_view(store, cursor, today);
    writeln!(out, "{} {}", cursor.month_name(), cursor.year())?;
    let headers: Vec<String> = WEEKDAY_HEADERS
        .iter()
        .map(|header| format!("{header:>4}"))
        .collect();
    writeln!(out, "{}", headers.concat())?;

    for week in cells.chunks(7) {
        let row: Vec<String> = week
            .iter()
            .map(|cell| {
                let marker = if cell.is_today {
                    '>'
                } else if cell.indicators.is_some() {
                    '*'
                } else {
                    ' '
                };
                if cell.in_month {
                    format!("{marker}{:>3}", cell.date.day())
                } else {
                    "    ".to_string()
                }
            })
            .collect();
        writeln!(out, "{}", row.concat())?;
    }

    for cell in cells.iter().filter(|cell| cell.in_month) {
        let Some(indicators) = &cell.indicators else {
            continue;
        };
        let mut parts: Vec<String> = indicators
            .tasks
            .iter()
            .map(|task| {
                let check = if task.completed { "x " } else { "" };
                format!("{check}{} {}", task.icon, task.text)
            })
            .collect();
        if indicators.hidden_task_count > 0 {
            parts.push(format!("+{} more", indicators.hidden_task_count));
        }
        if let Some(water) = indicators.water_count {
            parts.push(format!("water {water}"));
        }
        if let Some(mood) = indicators.mood {
            parts.push(mood.emoji().to_string());
        }
        if indicators.has_notes {
            parts.push("notes".to_string());
        }
        writeln!(out, "{}  {}", cell.date, parts.join(", "))?;
    }
    Ok(())
}
