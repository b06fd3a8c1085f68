// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

mod terminal;

use std::sync::Arc;

use clap::Args;
use tabled::Tabled;

use crate::{
    client::EmergencyRecord,
    error::{self, Result, Validation},
};

pub(crate) use terminal::Terminal;

pub(crate) const PATIENT_ID_PARAMETER: &str = "patient_id";

const NOT_RECORDED: &str = "Not recorded";
const FREE_TEXT_FALLBACK: &str = "None recorded";

/// Where the emergency data (or its absence) is shown.
pub(crate) trait Panel {
    fn loading(&self);
    fn summary(&self, summary: &Summary);
    fn empty(&self);
}

/// The "view full record" affordance.
pub(crate) trait Toggle {
    fn set_visible(&self, visible: bool);
}

pub(crate) trait Notices {
    fn validation(&self, problem: Validation);
}

pub(crate) trait Navigator {
    fn navigate(&self, reference: &str);
}

/// The page references we can leave the emergency page for.
#[derive(Clone, Debug, Args)]
pub(crate) struct Pages {
    /// The page reference to send caregivers to when they need to sign in.
    #[arg(long, default_value = "practitioner-login.html")]
    pub(crate) login_page: String,

    /// The page reference that shows a patient's complete record. The patient
    /// identifier is appended as a query parameter.
    #[arg(long, default_value = "practitioner-patient-view.html")]
    pub(crate) full_record_page: String,
}

impl Default for Pages {
    fn default() -> Self {
        Self {
            login_page: "practitioner-login.html".to_owned(),
            full_record_page: "practitioner-patient-view.html".to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Target {
    Login,
    FullRecord { patient_id: String },
}

impl Target {
    pub(crate) fn reference(&self, pages: &Pages) -> String {
        match self {
            Self::Login => pages.login_page.clone(),
            Self::FullRecord { patient_id } => format!(
                "{}?{}={}",
                pages.full_record_page,
                PATIENT_ID_PARAMETER,
                urlencoding::encode(patient_id)
            ),
        }
    }
}

/// An emergency record with every field ready for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) name: String,
    pub(crate) blood_type: String,
    pub(crate) allergies: String,
    pub(crate) chronic_conditions: String,
    pub(crate) emergency_notes: String,
}

#[derive(Tabled)]
pub(crate) struct Row<'summary> {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: &'summary str,
}

impl Summary {
    pub(crate) fn rows(&self) -> [Row<'_>; 5] {
        [
            Row {
                field: "Name",
                value: &self.name,
            },
            Row {
                field: "Blood Type",
                value: &self.blood_type,
            },
            Row {
                field: "Allergies",
                value: &self.allergies,
            },
            Row {
                field: "Chronic Conditions",
                value: &self.chronic_conditions,
            },
            Row {
                field: "Emergency Notes",
                value: &self.emergency_notes,
            },
        ]
    }
}

fn or_fallback(value: Option<&String>, fallback: &str) -> String {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
        .to_owned()
}

impl From<&EmergencyRecord> for Summary {
    fn from(record: &EmergencyRecord) -> Self {
        let name = format!("{} {}", record.first_name.trim(), record.last_name.trim());
        Self {
            name: or_fallback(Some(&name), NOT_RECORDED),
            blood_type: or_fallback(record.blood_type.as_ref(), NOT_RECORDED),
            allergies: or_fallback(record.allergies.as_ref(), FREE_TEXT_FALLBACK),
            chronic_conditions: or_fallback(
                record.chronic_conditions.as_ref(),
                FREE_TEXT_FALLBACK,
            ),
            emergency_notes: or_fallback(record.emergency_notes.as_ref(), FREE_TEXT_FALLBACK),
        }
    }
}

/// The capabilities the lookup controller drives, plus where navigation
/// leads.
pub(crate) struct Page {
    pub(crate) panel: Arc<dyn Panel + Send + Sync>,
    pub(crate) toggle: Arc<dyn Toggle + Send + Sync>,
    pub(crate) notices: Arc<dyn Notices + Send + Sync>,
    pub(crate) navigator: Arc<dyn Navigator + Send + Sync>,
    pub(crate) pages: Pages,
}

impl Page {
    pub(crate) fn builder(pages: Pages) -> PageBuilder {
        PageBuilder {
            panel: None,
            toggle: None,
            notices: None,
            navigator: None,
            pages,
        }
    }
}

pub(crate) struct PageBuilder {
    panel: Option<Arc<dyn Panel + Send + Sync>>,
    toggle: Option<Arc<dyn Toggle + Send + Sync>>,
    notices: Option<Arc<dyn Notices + Send + Sync>>,
    navigator: Option<Arc<dyn Navigator + Send + Sync>>,
    pages: Pages,
}

impl PageBuilder {
    pub(crate) fn with_panel<P: Panel + Send + Sync + 'static>(mut self, panel: Arc<P>) -> Self {
        self.panel = Some(panel);
        self
    }

    pub(crate) fn with_toggle<T: Toggle + Send + Sync + 'static>(mut self, toggle: Arc<T>) -> Self {
        self.toggle = Some(toggle);
        self
    }

    pub(crate) fn with_notices<N: Notices + Send + Sync + 'static>(
        mut self,
        notices: Arc<N>,
    ) -> Self {
        self.notices = Some(notices);
        self
    }

    pub(crate) fn with_navigator<N: Navigator + Send + Sync + 'static>(
        mut self,
        navigator: Arc<N>,
    ) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Wires up every capability from one implementation.
    pub(crate) fn with_all<T: Panel + Toggle + Notices + Navigator + Send + Sync + 'static>(
        self,
        all: &Arc<T>,
    ) -> Self {
        self.with_panel(Arc::clone(all))
            .with_toggle(Arc::clone(all))
            .with_notices(Arc::clone(all))
            .with_navigator(Arc::clone(all))
    }

    pub(crate) fn build(self) -> Result<Page> {
        match (self.panel, self.toggle, self.notices, self.navigator) {
            (Some(panel), Some(toggle), Some(notices), Some(navigator)) => {
                // Start from a clean page: nothing has been looked up yet.
                toggle.set_visible(false);
                Ok(Page {
                    panel,
                    toggle,
                    notices,
                    navigator,
                    pages: self.pages,
                })
            }
            (panel, toggle, notices, navigator) => {
                let missing = [
                    ("panel", panel.is_none()),
                    ("toggle", toggle.is_none()),
                    ("notices", notices.is_none()),
                    ("navigator", navigator.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(error::Page::MissingCapabilities(missing).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> EmergencyRecord {
        EmergencyRecord {
            id: "PT 001".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Okafor".to_owned(),
            blood_type: None,
            allergies: Some("   ".to_owned()),
            chronic_conditions: Some("Asthma".to_owned()),
            emergency_notes: Some(String::new()),
        }
    }

    #[test]
    fn summary_substitutes_fallbacks() {
        let summary = Summary::from(&record());
        assert_eq!(summary.name, "Ada Okafor");
        assert_eq!(summary.blood_type, "Not recorded");
        assert_eq!(summary.allergies, "None recorded");
        assert_eq!(summary.chronic_conditions, "Asthma");
        assert_eq!(summary.emergency_notes, "None recorded");
        assert!(summary.rows().iter().all(|row| !row.value.is_empty()));
    }

    #[test]
    fn unnamed_patient_still_shows_emergency_data() {
        let record = EmergencyRecord {
            first_name: String::new(),
            last_name: " ".to_owned(),
            blood_type: Some("O-".to_owned()),
            ..record()
        };
        let summary = Summary::from(&record);
        assert_eq!(summary.name, "Not recorded");
        assert_eq!(summary.blood_type, "O-");
    }

    #[test]
    fn login_reference_has_no_parameters() {
        assert_eq!(
            Target::Login.reference(&Pages::default()),
            "practitioner-login.html"
        );
    }

    #[test]
    fn full_record_reference_is_percent_encoded() {
        let target = Target::FullRecord {
            patient_id: "PT 001".to_owned(),
        };
        assert_eq!(
            target.reference(&Pages::default()),
            "practitioner-patient-view.html?patient_id=PT%20001"
        );

        let target = Target::FullRecord {
            patient_id: "a&b=c/d".to_owned(),
        };
        assert_eq!(
            target.reference(&Pages::default()),
            "practitioner-patient-view.html?patient_id=a%26b%3Dc%2Fd"
        );
    }

    #[test]
    fn builder_reports_every_missing_capability() {
        let terminal = Arc::new(Terminal::new(None));
        let result = Page::builder(Pages::default())
            .with_panel(Arc::clone(&terminal))
            .with_navigator(terminal)
            .build();

        match result {
            Err(error::Error::Page(error::Page::MissingCapabilities(missing))) => {
                assert_eq!(missing, vec!["toggle", "notices"]);
            }
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("page built without a toggle or notices"),
        }
    }
}
