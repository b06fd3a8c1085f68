// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::{AtomicBool, Ordering};

use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table,
};

use crate::error::Validation;

use super::{Navigator, Notices, Panel, Summary, Toggle};

/// Renders the emergency page to the terminal. The summary and navigation
/// references go to standard output so they can be consumed by other
/// programs; everything else goes to standard error.
pub(crate) struct Terminal {
    hint: Option<&'static str>,
    full_record_visible: AtomicBool,
}

impl Terminal {
    pub(crate) const fn new(hint: Option<&'static str>) -> Self {
        Self {
            hint,
            full_record_visible: AtomicBool::new(false),
        }
    }
}

impl Panel for Terminal {
    fn loading(&self) {
        eprintln!("Loading emergency data…");
    }

    fn summary(&self, summary: &Summary) {
        println!("Emergency Data");
        println!(
            "{}",
            Table::new(summary.rows())
                .with(Style::rounded())
                .with(Modify::new(Columns::new(..)).with(Alignment::left()))
        );
    }

    fn empty(&self) {
        eprintln!("No emergency data found for this QR token.");
    }
}

impl Toggle for Terminal {
    fn set_visible(&self, visible: bool) {
        let was_visible = self.full_record_visible.swap(visible, Ordering::SeqCst);
        if visible && !was_visible {
            if let Some(hint) = self.hint {
                eprintln!("{hint}");
            }
        }
    }
}

impl Notices for Terminal {
    fn validation(&self, problem: Validation) {
        eprintln!("Error: {problem}");
    }
}

impl Navigator for Terminal {
    fn navigate(&self, reference: &str) {
        println!("{reference}");
    }
}
