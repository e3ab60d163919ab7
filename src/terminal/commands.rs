use thiserror::Error;

use crate::message::StatsQuery;
use crate::services::view_model::PredictionForm;

pub const HELP: &str = "\
commands:
  <text>                      ask the assistant
  /predict day=.. month=.. year=.. hour=.. pt08_s1_co=.. c6h6_gt=.. pt08_s5_o3=.. pt08_s2_nmhc=.. pt08_s4_no2=..
                              fill the prediction form (any subset) and submit it
  /stats <type> <start_day> <start_month> <end_day> <end_month> <year>
  /clear                      clear the input line
  /help                       show this text
  /quit                       exit";

/// One line typed at the console.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Send(String),
    Predict(Vec<(String, String)>),
    Stats(StatsQuery),
    Clear,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command /{0} (try /help)")]
    Unknown(String),
    #[error("expected field=value, got {0:?}")]
    MalformedAssignment(String),
    #[error("unknown prediction field {0:?}")]
    UnknownField(String),
    #[error("usage: /stats <type> <start_day> <start_month> <end_day> <end_month> <year>")]
    StatsUsage,
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        // Whitespace-only input still goes through; sending it is a no-op.
        return Ok(Command::Send(line.to_string()));
    };

    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or_default();
    match name {
        "predict" => words
            .map(|word| {
                let (id, value) = word
                    .split_once('=')
                    .ok_or_else(|| CommandError::MalformedAssignment(word.to_string()))?;
                if !PredictionForm::FIELD_IDS.contains(&id) {
                    return Err(CommandError::UnknownField(id.to_string()));
                }
                Ok((id.to_string(), value.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Command::Predict),
        "stats" => parse_stats(words.collect()),
        "clear" => Ok(Command::Clear),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn parse_stats(args: Vec<&str>) -> Result<Command, CommandError> {
    let [stat_type, numbers @ ..] = args.as_slice() else {
        return Err(CommandError::StatsUsage);
    };
    let numbers: Vec<i64> = numbers
        .iter()
        .map(|n| n.parse().map_err(|_| CommandError::StatsUsage))
        .collect::<Result<_, _>>()?;
    let &[start_day, start_month, end_day, end_month, year] = numbers.as_slice() else {
        return Err(CommandError::StatsUsage);
    };

    Ok(Command::Stats(StatsQuery {
        stat_type: stat_type.to_string(),
        start_day,
        start_month,
        end_day,
        end_month,
        year,
    }))
}
