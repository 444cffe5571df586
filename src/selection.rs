//! Interactive selection of cities, dates and the follow-up action
//!
//! Every prompt reads from any [`BufRead`] and writes to any [`Write`] so the
//! flow works the same against a terminal or an in-memory script.

use crate::actions::Action;
use crate::models::DateRange;
use crate::models::dates::parse_date;
use crate::registry::CityRegistry;
use crate::{CityTempError, Result};
use chrono::NaiveDate;
use std::io::{BufRead, Write};

const DONE: &str = "Done";

/// Read one trimmed line after a `>` prompt; EOF is an error
fn read_answer<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    write!(output, ">")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(CityTempError::input("no more input"));
    }
    Ok(line.trim().to_string())
}

/// Prompt until the user types `Done` or every city has been picked
pub fn pick_cities<R: BufRead, W: Write>(
    registry: &CityRegistry,
    input: &mut R,
    output: &mut W,
) -> Result<Vec<String>> {
    let mut remaining = registry.names();
    let mut picked: Vec<String> = Vec::new();

    while !remaining.is_empty() {
        if picked.is_empty() {
            writeln!(output, "Pick a city:")?;
        } else {
            writeln!(
                output,
                "Type \"{DONE}\" to proceed with the existing cities or add another:"
            )?;
        }
        for city in &remaining {
            writeln!(output, "{city}")?;
        }

        let choice = loop {
            let answer = read_answer(input, output)?;
            if !picked.is_empty() && answer.eq_ignore_ascii_case(DONE) {
                break None;
            }
            if let Some(city) = remaining
                .iter()
                .copied()
                .find(|city| city.eq_ignore_ascii_case(&answer))
            {
                break Some(city);
            }
            writeln!(output, "That is an invalid response. Try again.")?;
        };

        match choice {
            Some(city) => {
                remaining.retain(|c| *c != city);
                picked.push(city.to_string());
            }
            None => break,
        }
    }

    Ok(picked)
}

/// Check a date typed by the user: well-formed and strictly in the past
pub fn validate_past_date(text: &str, today: NaiveDate) -> Result<NaiveDate> {
    let date = parse_date(text)?;
    if date >= today {
        return Err(CityTempError::validation(
            "The date entered must be a previous date.",
        ));
    }
    Ok(date)
}

/// Check a complete range from text, as given on the command line
pub fn validate_range(start: &str, end: &str, today: NaiveDate) -> Result<DateRange> {
    let start = validate_past_date(start, today)?;
    let end = validate_past_date(end, today)?;
    DateRange::new(start, end)
}

fn prompt_date<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    today: NaiveDate,
    not_before: Option<NaiveDate>,
) -> Result<NaiveDate> {
    loop {
        let answer = read_answer(input, output)?;
        match parse_date(&answer) {
            Err(_) => writeln!(output, "The date format entered is invalid. Please try again.")?,
            Ok(date) if date >= today => writeln!(
                output,
                "The date entered must be a previous date. Please try again."
            )?,
            Ok(date) if not_before.is_some_and(|start| date < start) => writeln!(
                output,
                "The end date must be on or after the start date. Please try again."
            )?,
            Ok(date) => return Ok(date),
        }
    }
}

/// Prompt for a start and end date, both before `today`, end not before start
pub fn prompt_date_range<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    today: NaiveDate,
) -> Result<DateRange> {
    writeln!(output, "Enter a start date:")?;
    let start = prompt_date(input, output, today, None)?;

    writeln!(output, "Enter an end date:")?;
    let end = prompt_date(input, output, today, Some(start))?;

    DateRange::new(start, end)
}

/// Prompt for what to do with the data
pub fn prompt_action<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Action> {
    writeln!(output, "What would you like to do?")?;
    loop {
        writeln!(
            output,
            "(A) Print Raw Data\n(B) Plot Data on Graph\n(C) Import into Database"
        )?;
        let answer = read_answer(input, output)?;
        if let Some(action) = Action::from_letter(&answer) {
            return Ok(action);
        }
        writeln!(output, "That was not a valid selection. Please try again.")?;
    }
}
