//! Sitzungs-Intents und Rückgaben an den Host.
//! Intents sind bereits dekodierte Eingaben; das Mapping von Tasten- und
//! Maus-Events auf Intents liegt beim Host.

use crate::core::curve::{HandleMode, HandleSide};
use glam::DVec3;

/// Eingabe an eine laufende Recurve-Sitzung
#[derive(Debug, Clone, PartialEq)]
pub enum SessionIntent {
    /// Auflösung um 1 erhöhen (Mausrad hoch / Plus)
    IncreaseResolution,
    /// Auflösung um 1 verringern, nie unter das Topologie-Minimum
    DecreaseResolution,
    /// Bestätigen: Auflösung übernehmen bzw. Ergebnis finalisieren
    Confirm,
    /// Abbrechen: Original-Positionen wiederherstellen
    Cancel,
    /// Zeiger bewegt (Kurve kann extern verändert worden sein)
    PointerMoved,
    /// Kurven-Knoten verschoben
    MoveKnot { knot: usize, position: DVec3 },
    /// Handle eines Knotens verschoben
    MoveHandle {
        knot: usize,
        side: HandleSide,
        position: DVec3,
    },
    /// Handle-Modus eines Knotens umgeschaltet
    SetHandleMode { knot: usize, mode: HandleMode },
}

/// Rückgabe je verarbeitetem Intent, steuert den Host-Modal-Loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionDisposition {
    /// Sitzung läuft weiter, Event wurde verbraucht
    Running,
    /// Sitzung läuft weiter, Event darf an den Host weitergereicht werden
    PassThrough,
    /// Sitzung erfolgreich beendet, Positionen finalisiert
    Finished,
    /// Sitzung abgebrochen, Original-Positionen wiederhergestellt
    Cancelled,
}

impl SessionDisposition {
    /// Ist die Sitzung mit dieser Rückgabe beendet?
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Cancelled)
    }
}
