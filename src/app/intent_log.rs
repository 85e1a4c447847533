//! Verlauf einer Operator-Instanz: welche Intents kamen an und wie hat die
//! Sitzung darauf reagiert. Die CLI gibt die Zusammenfassung am Ende aus.

use super::{SessionDisposition, SessionIntent};
use std::collections::VecDeque;

/// Obergrenze gespeicherter Einträge; älteste fallen zuerst heraus
const CAPACITY: usize = 256;

/// Ein verarbeiteter Intent samt Ergebnis
#[derive(Debug, Clone, PartialEq)]
pub struct IntentRecord {
    pub intent: SessionIntent,
    /// `None` wenn die Verarbeitung mit einem Fehler endete
    pub outcome: Option<SessionDisposition>,
}

/// Ringpuffer der zuletzt verarbeiteten Intents.
#[derive(Debug, Default)]
pub struct IntentLog {
    records: VecDeque<IntentRecord>,
}

impl IntentLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hängt einen verarbeiteten Intent an.
    pub fn record(&mut self, intent: SessionIntent, outcome: Option<SessionDisposition>) {
        if self.records.len() == CAPACITY {
            self.records.pop_front();
        }
        self.records.push_back(IntentRecord { intent, outcome });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Einträge in Eingangsreihenfolge
    pub fn records(&self) -> impl Iterator<Item = &IntentRecord> {
        self.records.iter()
    }

    /// Nur die Intents, ohne Ergebnis
    pub fn intents(&self) -> Vec<SessionIntent> {
        self.records.iter().map(|r| r.intent.clone()).collect()
    }

    /// Anzahl fehlgeschlagener Intents
    pub fn error_count(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_none()).count()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Einzeilige Zusammenfassung für das Log, z.B.
    /// `3 Intents (1 Auflösung, 2 Bestätigen, 0 Kurve, 0 Fehler) → Finished`.
    pub fn summary(&self) -> String {
        let mut resolution = 0;
        let mut confirm = 0;
        let mut curve = 0;
        for record in &self.records {
            match record.intent {
                SessionIntent::IncreaseResolution | SessionIntent::DecreaseResolution => {
                    resolution += 1
                }
                SessionIntent::Confirm => confirm += 1,
                SessionIntent::MoveKnot { .. }
                | SessionIntent::MoveHandle { .. }
                | SessionIntent::SetHandleMode { .. } => curve += 1,
                SessionIntent::Cancel | SessionIntent::PointerMoved => {}
            }
        }

        let last = match self.records.back() {
            Some(IntentRecord {
                outcome: Some(disposition),
                ..
            }) => format!("{:?}", disposition),
            Some(_) => "Fehler".to_string(),
            None => "-".to_string(),
        };

        format!(
            "{} Intents ({} Auflösung, {} Bestätigen, {} Kurve, {} Fehler) → {}",
            self.records.len(),
            resolution,
            confirm,
            curve,
            self.error_count(),
            last
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oldest_records_drop_out() {
        let mut log = IntentLog::new();
        log.record(SessionIntent::Confirm, Some(SessionDisposition::Running));
        for _ in 0..CAPACITY {
            log.record(SessionIntent::PointerMoved, None);
        }
        assert_eq!(log.len(), CAPACITY);
        assert!(log
            .records()
            .all(|r| r.intent == SessionIntent::PointerMoved));
        assert_eq!(log.error_count(), CAPACITY);
    }

    #[test]
    fn test_summary_counts_groups_and_last_outcome() {
        let mut log = IntentLog::new();
        assert!(log.summary().ends_with("→ -"));

        log.record(
            SessionIntent::IncreaseResolution,
            Some(SessionDisposition::Running),
        );
        log.record(SessionIntent::Confirm, Some(SessionDisposition::Running));
        log.record(
            SessionIntent::MoveKnot {
                knot: 9,
                position: glam::DVec3::ZERO,
            },
            None,
        );
        assert_eq!(
            log.summary(),
            "3 Intents (1 Auflösung, 1 Bestätigen, 1 Kurve, 1 Fehler) → Fehler"
        );

        log.record(SessionIntent::Confirm, Some(SessionDisposition::Finished));
        assert!(log.summary().ends_with("→ Finished"));
    }
}
