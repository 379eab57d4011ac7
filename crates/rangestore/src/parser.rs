//! Workload trace parser using nom
//!
//! Trace format, one operation per line:
//! ```text
//! # comments and blank lines are ignored
//! range <left> <right>
//! update <index> <value>
//! ```

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{digit1, i64 as signed, space0, space1},
    combinator::{all_consuming, map, map_res},
    sequence::{delimited, preceded, tuple},
    IResult,
};

use crate::error::{Error, Result};
use crate::operation::Operation;

/// Comment marker for trace files
pub const COMMENT: char = '#';

fn index(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>)(input)
}

fn range_op(input: &str) -> IResult<&str, Operation> {
    map(
        preceded(
            tag("range"),
            tuple((preceded(space1, index), preceded(space1, index))),
        ),
        |(left, right)| Operation::Range { left, right },
    )(input)
}

fn update_op(input: &str) -> IResult<&str, Operation> {
    map(
        preceded(
            tag("update"),
            tuple((preceded(space1, index), preceded(space1, signed))),
        ),
        |(index, value)| Operation::Update { index, value },
    )(input)
}

/// Parse a single operation line
pub fn parse_operation(line: &str) -> Result<Operation> {
    let (_, op) = all_consuming(delimited(space0, alt((range_op, update_op)), space0))(line)?;
    Ok(op)
}

/// Parse a whole trace, skipping blank lines and comments
pub fn parse_operations(input: &str) -> Result<Vec<Operation>> {
    let mut ops = Vec::new();

    for (number, line) in input.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT) {
            continue;
        }

        let op = parse_operation(trimmed).map_err(|_| {
            Error::Parse(format!("line {}: invalid operation '{}'", number + 1, trimmed))
        })?;
        ops.push(op);
    }

    Ok(ops)
}

/// Read and parse a trace file
pub fn read_operations<P: AsRef<Path>>(path: P) -> Result<Vec<Operation>> {
    let text = fs::read_to_string(path)?;
    parse_operations(&text)
}

/// Write operations as a trace file
pub fn write_operations<P: AsRef<Path>>(path: P, ops: &[Operation]) -> Result<()> {
    let mut out = BufWriter::new(fs::File::create(path)?);
    for op in ops {
        writeln!(out, "{}", op)?;
    }
    out.flush()?;
    Ok(())
}
