// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::Write;

use super::{Completion, common_prefix};
use crate::{CRLF, LineEditor, ReadlineResult, measure_display_width};

impl LineEditor {
    /// Applies a finished completion for the text left of the cursor.
    ///
    /// 1. The candidates share a prefix longer than `matched`: insert the extension.
    /// 2. `matched` doesn't start with that prefix: replace `matched` with it.
    /// 3. Otherwise, on the second consecutive tab, list the candidates.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be written to.
    pub fn apply_completion(
        &mut self,
        out: &mut dyn Write,
        completion: Completion,
        last_keypress_was_tab: bool,
    ) -> ReadlineResult<()> {
        let Completion {
            candidates,
            matched,
        } = completion;

        if candidates.is_empty() {
            return Ok(());
        }

        let prefix = common_prefix(
            candidates
                .iter()
                .filter(|it| !it.is_empty())
                .map(String::as_str),
        );

        if prefix.starts_with(&matched) && prefix.len() > matched.len() {
            return self.insert_string(out, &prefix[matched.len()..]);
        }

        if !matched.starts_with(&prefix) {
            let cursor = self.line_state.cursor;
            let mut start = cursor.saturating_sub(matched.len());
            while !self.line_state.text.is_char_boundary(start) {
                start -= 1;
            }
            self.before_edit();
            self.line_state.text.replace_range(start..cursor, &prefix);
            self.line_state.cursor = start + prefix.len();
            return self.refresh_line(out);
        }

        if !last_keypress_was_tab {
            return Ok(());
        }

        self.before_edit();
        let listing = format_completion_listing(&candidates, self.columns);
        out.write_all(listing.as_bytes())?;
        self.refresh_line(out)
    }
}

/// Lays candidates out in columns `max width + 2` wide, as many per row as `columns`
/// allows (one per row when the width is unknown). Empty candidates break the row and
/// add a blank line between groups.
#[must_use]
pub fn format_completion_listing(candidates: &[String], columns: Option<usize>) -> String {
    let widths: Vec<usize> = candidates
        .iter()
        .map(|it| measure_display_width(it, true))
        .collect();
    let width = widths.iter().copied().max().unwrap_or(0) + 2;
    let max_columns = match columns {
        Some(columns) => (columns / width).max(1),
        None => 1,
    };

    let mut acc = String::from(CRLF);
    let mut line_index = 0;
    let mut whitespace = 0;

    for (candidate, candidate_width) in candidates.iter().zip(widths) {
        if candidate.is_empty() || line_index == max_columns {
            acc.push_str(CRLF);
            line_index = 0;
            whitespace = 0;
        } else {
            acc.push_str(&" ".repeat(whitespace));
        }

        if candidate.is_empty() {
            acc.push_str(CRLF);
        } else {
            acc.push_str(candidate);
            whitespace = width - candidate_width;
            line_index += 1;
        }
    }

    if line_index != 0 {
        acc.push_str(CRLF);
        acc.push_str(CRLF);
    }

    acc
}
