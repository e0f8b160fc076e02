//! Parser for flat signal record files.
//!
//! The data store itself is an external collaborator; what reaches this
//! crate is three flat record sets, one file per source:
//! - clicks.csv:  user_id,item_id,click_count
//! - orders.csv:  user_id,item_id,order_count
//! - ratings.csv: user_id,item_id,rating
//!
//! Lines are comma-separated, empty lines are skipped. Values must be
//! non-negative and finite.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Result, SignalError};
use crate::types::{Interaction, SignalKind, SignalSet};

/// Parse one signal file into its record set.
pub fn parse_interactions(path: &Path, kind: SignalKind) -> Result<Vec<Interaction>> {
    let file_name = kind.file_name();
    let content = fs::read_to_string(path)?;
    let mut records = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut parts = trimmed.split(',');

        let user_id = parse_field(parts.next(), "user_id", file_name, line_no)?;
        let item_id = parse_field(parts.next(), "item_id", file_name, line_no)?;
        let value: f32 = parse_field(parts.next(), "value", file_name, line_no)?;

        if parts.next().is_some() {
            return Err(SignalError::Parse {
                file: file_name.to_string(),
                line: line_no,
                reason: "Expected exactly 3 fields".to_string(),
            });
        }
        if !value.is_finite() || value < 0.0 {
            return Err(SignalError::InvalidValue {
                field: "value".to_string(),
                value: value.to_string(),
            });
        }

        records.push(Interaction::new(user_id, item_id, value));
    }

    Ok(records)
}

fn parse_field<T: std::str::FromStr>(
    field: Option<&str>,
    name: &str,
    file: &str,
    line: usize,
) -> Result<T> {
    let raw = field.ok_or_else(|| SignalError::Parse {
        file: file.to_string(),
        line,
        reason: format!("Missing {}", name),
    })?;
    raw.trim().parse().map_err(|_| SignalError::Parse {
        file: file.to_string(),
        line,
        reason: format!("Invalid {}: '{}'", name, raw.trim()),
    })
}

/// Load all three signal files from a directory, in parallel.
pub fn load_signal_set(data_dir: &Path) -> Result<SignalSet> {
    let clicks_path = data_dir.join(SignalKind::Clicks.file_name());
    let orders_path = data_dir.join(SignalKind::Orders.file_name());
    let ratings_path = data_dir.join(SignalKind::Ratings.file_name());

    // Three-way parallelism via nested joins
    let ((clicks, orders), ratings) = rayon::join(
        || {
            rayon::join(
                || parse_interactions(&clicks_path, SignalKind::Clicks),
                || parse_interactions(&orders_path, SignalKind::Orders),
            )
        },
        || parse_interactions(&ratings_path, SignalKind::Ratings),
    );

    let set = SignalSet {
        clicks: clicks?,
        orders: orders?,
        ratings: ratings?,
    };

    let (clicks, orders, ratings) = set.counts();
    info!(clicks, orders, ratings, "Loaded signal record sets");
    Ok(set)
}
