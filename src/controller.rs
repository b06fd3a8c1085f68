// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use futures_util::lock::Mutex;
use log::{debug, error, info, warn};

use crate::{
    client::{EmergencyRecord, QrToken, Records, Sessions},
    error::{Error, Validation},
    page::{Page, Summary, Target},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    Idle,
    Loading,
    Found,
    NavigatingToFullRecord,
    NavigatingToLogin,
}

impl Phase {
    pub(crate) const fn is_terminal(self) -> bool {
        matches!(self, Self::NavigatingToFullRecord | Self::NavigatingToLogin)
    }
}

#[derive(Debug)]
pub(crate) enum Lookup {
    Rejected,
    Found(EmergencyRecord),
    NotFound,
    Failed(Error),
    /// A later lookup started before this one finished, so its result was
    /// thrown away.
    Superseded,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Navigation {
    Rejected,
    Superseded,
    Login(String),
    FullRecord(String),
}

struct State {
    generation: u64,
    patient_id: Option<String>,
    phase: Phase,
}

/// Drives the emergency page: looks up a QR token and, once a record has
/// been found, lets the caregiver move on to the full record.
///
/// The state lock is never held while waiting on the backend. Each lookup
/// takes a new generation number, and a response is only applied if its
/// generation is still current when it arrives.
pub(crate) struct Controller<R, S> {
    records: R,
    sessions: S,
    page: Page,
    state: Mutex<State>,
}

impl<R: Records + Send + Sync, S: Sessions + Send + Sync> Controller<R, S> {
    pub(crate) fn new(records: R, sessions: S, page: Page) -> Self {
        Self {
            records,
            sessions,
            page,
            state: Mutex::new(State {
                generation: 0,
                patient_id: None,
                phase: Phase::Idle,
            }),
        }
    }

    pub(crate) async fn phase(&self) -> Phase {
        self.state.lock().await.phase
    }

    pub(crate) async fn lookup(&self, input: &str) -> Lookup {
        let token = QrToken::parse(input);

        let generation = {
            let mut state = self.state.lock().await;
            state.generation += 1;
            state.patient_id = None;
            self.page.toggle.set_visible(false);

            if token.is_some() {
                state.phase = Phase::Loading;
                self.page.panel.loading();
            } else {
                state.phase = Phase::Idle;
            }
            state.generation
        };

        let Some(token) = token else {
            self.page.notices.validation(Validation::TokenRequired);
            return Lookup::Rejected;
        };

        debug!("Looking up emergency data for token {:?}", token.as_str());
        let result = self.records.find_by_token(&token).await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            debug!("Discarding result for token {:?}", token.as_str());
            return Lookup::Superseded;
        }

        match result {
            Ok(Some(record)) => {
                state.patient_id = Some(record.id.clone());
                state.phase = Phase::Found;
                self.page.panel.summary(&Summary::from(&record));
                self.page.toggle.set_visible(true);
                Lookup::Found(record)
            }
            Ok(None) => {
                warn!("No emergency record found for token {:?}", token.as_str());
                state.phase = Phase::Idle;
                self.page.panel.empty();
                Lookup::NotFound
            }
            Err(e) => {
                warn!("Emergency record lookup failed: {}", e);
                state.phase = Phase::Idle;
                self.page.panel.empty();
                Lookup::Failed(e)
            }
        }
    }

    pub(crate) async fn view_full_record(&self) -> Navigation {
        let (generation, patient_id) = {
            let state = self.state.lock().await;
            match state.patient_id.clone() {
                Some(patient_id) => (state.generation, patient_id),
                None => {
                    self.page.notices.validation(Validation::NoRecordLoaded);
                    return Navigation::Rejected;
                }
            }
        };

        let signed_in = match self.sessions.current_session().await {
            Ok(session) => session.is_some(),
            Err(e) => {
                error!("Session check failed: {}", e);
                false
            }
        };

        let mut state = self.state.lock().await;
        if state.generation != generation {
            debug!("A new lookup started while checking the session; staying put");
            return Navigation::Superseded;
        }

        if signed_in {
            let reference = Target::FullRecord { patient_id }.reference(&self.page.pages);
            info!("Opening the full record at {}", reference);
            state.phase = Phase::NavigatingToFullRecord;
            self.page.navigator.navigate(&reference);
            Navigation::FullRecord(reference)
        } else {
            let reference = Target::Login.reference(&self.page.pages);
            info!("No caregiver session; sending to {}", reference);
            state.phase = Phase::NavigatingToLogin;
            self.page.navigator.navigate(&reference);
            Navigation::Login(reference)
        }
    }
}
