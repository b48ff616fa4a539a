// SPDX: CC0-1.0

use crate::{envelope::Envelope, Number, SampleGrid};
use anyhow::Context;
use core::{fmt, num::ParseFloatError};
use std::io::{self, stdin, BufRead, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    SetScene,
    SetParams,
    SetWin,
    PrintFrames,
    Draw,
}

impl Command {
    pub const fn exhaustive() -> &'static [Command] {
        &[
            Self::Help,
            Self::Quit,
            Self::SetScene,
            Self::SetParams,
            Self::SetWin,
            Self::Draw,
            Self::PrintFrames,
        ]
    }

    pub const fn help(&self) -> &'static str {
        match self {
            Self::Help => "display help for each command",
            Self::Quit => "quit the shell",
            Self::SetScene => "choose what to draw",
            Self::SetParams => "set curve coefficients and tangent count",
            Self::SetWin => "set window and sample grid",
            Self::PrintFrames => "print the tangent of every animation frame (for debugging)",
            Self::Draw => "draw the current scene with gnuplot",
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Quit => "quit",
            Self::SetScene => "scene",
            Self::SetParams => "params",
            Self::SetWin => "window",
            Self::PrintFrames => "frames",
            Self::Draw => "draw",
        }
    }

    /// Command whose name is closest to `s`, if any is reasonably close.
    pub fn most_similar(s: &str) -> Option<Command> {
        Self::exhaustive()
            .iter()
            .map(|c| (strsim::normalized_damerau_levenshtein(s, c.name()), *c))
            .reduce(|(acc_sim, acc), (elem_sim, elem)| {
                if elem_sim > acc_sim {
                    (elem_sim, elem)
                } else {
                    (acc_sim, acc)
                }
            })
            .filter(|(sim, _)| *sim > 0.3)
            .map(|(_, c)| c)
    }
}

impl core::str::FromStr for Command {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for c in Self::exhaustive() {
            if s == c.name() {
                return Ok(*c);
            }
        }
        Err(())
    }
}

/// A number typed by the user that is neither NaN nor infinite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Finite(pub Number);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FiniteErr {
    ParseNum(ParseFloatError),
    NonFinite,
}

impl fmt::Display for FiniteErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseNum(err) => write!(f, "invalid number: {err}"),
            Self::NonFinite => write!(f, "expected a finite number"),
        }
    }
}

impl core::str::FromStr for Finite {
    type Err = FiniteErr;
    // f64 parsing accepts "nan", "inf" and "infinity"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let num: Number = s.parse().map_err(FiniteErr::ParseNum)?;
        if num.is_finite() {
            Ok(Self(num))
        } else {
            Err(FiniteErr::NonFinite)
        }
    }
}

pub fn input<W: Write>(out: W, prompt: impl fmt::Display) -> anyhow::Result<String> {
    fn inner<W: Write>(mut out: W, prompt: impl fmt::Display) -> io::Result<String> {
        write!(out, "{prompt}")?;
        out.flush()?;
        let mut stdin = stdin().lock();
        let mut s = String::new();
        stdin.read_line(&mut s)?;
        Ok(s.trim().to_string())
    }

    let s = inner(out, prompt).context("read from standard input failed")?;
    Ok(s)
}

pub fn read_fromstr<W: Write, T: core::str::FromStr>(
    mut out: W,
    prompt: impl fmt::Display,
    ignore_empty: bool,
) -> anyhow::Result<Result<Option<T>, <T as core::str::FromStr>::Err>>
where
    <T as core::str::FromStr>::Err: fmt::Display,
{
    let input = input(&mut out, prompt)?;
    Ok(parse_reply(out, &input, ignore_empty)?)
}

/// Parses one reply to a prompt, reporting a malformed reply on `out`.
pub fn parse_reply<W: Write, T: core::str::FromStr>(
    mut out: W,
    input: &str,
    ignore_empty: bool,
) -> io::Result<Result<Option<T>, <T as core::str::FromStr>::Err>>
where
    <T as core::str::FromStr>::Err: fmt::Display,
{
    if ignore_empty && input.is_empty() {
        return Ok(Ok(None));
    }
    match input.parse::<T>() {
        Ok(new) => Ok(Ok(Some(new))),
        Err(err) => {
            writeln!(out)?;
            underline(&mut out, input)?;
            writeln!(out, "parse error: {err}")?;
            Ok(Err(err))
        }
    }
}

pub fn underline<W: Write>(mut out: W, text: &str) -> io::Result<()> {
    writeln!(out, "{text}")?;
    // NOTE(unicode): one caret per char, not per column
    writeln!(out, "{}", "^".repeat(text.chars().count().max(1)))?;
    Ok(())
}

pub fn dump_frames<W: Write>(
    mut out: W,
    envelope: &Envelope,
    grid: &SampleGrid,
    title: core::fmt::Arguments,
) -> io::Result<()> {
    writeln!(out, "{title}: ")?;
    writeln!(out, "  {}", envelope.parabola())?;
    for frame in envelope.frames(grid) {
        let (first, last) = match (frame.curve.first(), frame.curve.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => (Number::NAN, Number::NAN),
        };
        writeln!(
            out,
            "  frame {index}: m = {slope}, y({x0}) = {first}, y({x1}) = {last}",
            index = frame.index,
            slope = frame.slope,
            x0 = grid.domain().start,
            x1 = grid.domain().end,
        )?;
    }
    Ok(())
}
