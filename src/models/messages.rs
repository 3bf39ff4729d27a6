use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Instrument, InstrumentStates};

/// Messages a joined connection may send into its room's channel.
///
/// `sound` payloads are opaque and forwarded verbatim, never validated.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Start playing an instrument; re-broadcast to every room member.
    Play {
        instrument: Instrument,
        #[serde(default)]
        sound: Value,
    },
    /// Stop playing an instrument; re-broadcast to every room member.
    Stop {
        instrument: Instrument,
        #[serde(default)]
        sound: Value,
    },
    /// The connection claims an instrument it reserved out of band.
    ReservedInstrument { instrument: Instrument },
}

/// Events fanned out to every member of a room's channel.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RoomEvent {
    InstrumentReserved { instrument: Instrument },
    InstrumentReleased { instrument: Instrument },
    InstrumentsChanged { instruments: InstrumentStates },
    InstrumentPlayed { instrument: Instrument, sound: Value },
    InstrumentStopped { instrument: Instrument, sound: Value },
}
