//! Recurve-Operator: Einstiegspunkt für den Host.
//!
//! `invoke()` startet eine Sitzung auf der aktuellen Kanten-Selektion,
//! `modal()` reicht jedes Host-Event als Intent an die Sitzung weiter.

use super::{IntentLog, RecurveSession, SessionDisposition, SessionIntent};
use crate::core::MeshHost;
use crate::shared::RecurveOptions;

/// Hält höchstens eine laufende Sitzung und die Optionen.
#[derive(Default)]
pub struct RecurveOperator {
    options: RecurveOptions,
    session: Option<RecurveSession>,
    intent_log: IntentLog,
}

impl RecurveOperator {
    /// Erstellt einen Operator mit den gegebenen Optionen.
    pub fn new(options: RecurveOptions) -> Self {
        Self {
            options,
            session: None,
            intent_log: IntentLog::new(),
        }
    }

    /// Laufende Sitzung (falls vorhanden)
    pub fn session(&self) -> Option<&RecurveSession> {
        self.session.as_ref()
    }

    /// Läuft gerade eine Sitzung?
    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// Verlauf seit dem letzten `invoke()` (Intent + Ergebnis)
    pub fn intent_log(&self) -> &IntentLog {
        &self.intent_log
    }

    /// Statustext der laufenden Sitzung für das Overlay
    pub fn status_text(&self) -> Option<String> {
        self.session.as_ref().map(RecurveSession::status_text)
    }

    /// Startet eine Sitzung.
    ///
    /// Ohne selektierte Kanten wird sofort `Finished` zurückgegeben (nichts zu tun).
    /// Eine noch laufende Sitzung wird vorher abgebrochen.
    pub fn invoke(&mut self, host: &mut dyn MeshHost) -> anyhow::Result<SessionDisposition> {
        if let Some(mut previous) = self.session.take() {
            log::warn!("Recurve: laufende Sitzung wird durch neuen Aufruf abgebrochen");
            previous.handle_intent(host, SessionIntent::Cancel)?;
        }
        self.intent_log.clear();

        match RecurveSession::start(host, &self.options)? {
            Some(session) => {
                self.session = Some(session);
                Ok(SessionDisposition::Running)
            }
            None => Ok(SessionDisposition::Finished),
        }
    }

    /// Verarbeitet ein Host-Event. Beendete Sitzungen werden verworfen.
    ///
    /// Ohne laufende Sitzung werden Events durchgereicht.
    pub fn modal(
        &mut self,
        host: &mut dyn MeshHost,
        intent: SessionIntent,
    ) -> anyhow::Result<SessionDisposition> {
        let Some(session) = self.session.as_mut() else {
            log::debug!("Recurve: keine laufende Sitzung, Event {:?} ignoriert", intent);
            self.intent_log.record(intent, Some(SessionDisposition::PassThrough));
            return Ok(SessionDisposition::PassThrough);
        };

        let result = session.handle_intent(host, intent.clone());
        self.intent_log.record(intent, result.as_ref().ok().copied());
        match &result {
            Ok(disposition) if disposition.is_terminal() => {
                self.session = None;
            }
            Err(e) => {
                log::error!("Recurve: Event-Verarbeitung fehlgeschlagen: {:#}", e);
            }
            _ => {}
        }
        result
    }
}
