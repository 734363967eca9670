//! LV2 URIs the bridge knows by heart, and the fixed URID layout shared by
//! both ends of the pipe.

pub const ATOM_BLANK: &str = "http://lv2plug.in/ns/ext/atom#Blank";
pub const ATOM_BOOL: &str = "http://lv2plug.in/ns/ext/atom#Bool";
pub const ATOM_CHUNK: &str = "http://lv2plug.in/ns/ext/atom#Chunk";
pub const ATOM_DOUBLE: &str = "http://lv2plug.in/ns/ext/atom#Double";
pub const ATOM_EVENT: &str = "http://lv2plug.in/ns/ext/atom#Event";
pub const ATOM_FLOAT: &str = "http://lv2plug.in/ns/ext/atom#Float";
pub const ATOM_INT: &str = "http://lv2plug.in/ns/ext/atom#Int";
pub const ATOM_LITERAL: &str = "http://lv2plug.in/ns/ext/atom#Literal";
pub const ATOM_LONG: &str = "http://lv2plug.in/ns/ext/atom#Long";
pub const ATOM_NUMBER: &str = "http://lv2plug.in/ns/ext/atom#Number";
pub const ATOM_OBJECT: &str = "http://lv2plug.in/ns/ext/atom#Object";
pub const ATOM_PATH: &str = "http://lv2plug.in/ns/ext/atom#Path";
pub const ATOM_PROPERTY: &str = "http://lv2plug.in/ns/ext/atom#Property";
pub const ATOM_RESOURCE: &str = "http://lv2plug.in/ns/ext/atom#Resource";
pub const ATOM_SEQUENCE: &str = "http://lv2plug.in/ns/ext/atom#Sequence";
pub const ATOM_SOUND: &str = "http://lv2plug.in/ns/ext/atom#Sound";
pub const ATOM_STRING: &str = "http://lv2plug.in/ns/ext/atom#String";
pub const ATOM_TUPLE: &str = "http://lv2plug.in/ns/ext/atom#Tuple";
pub const ATOM_URI: &str = "http://lv2plug.in/ns/ext/atom#URI";
pub const ATOM_URID: &str = "http://lv2plug.in/ns/ext/atom#URID";
pub const ATOM_VECTOR: &str = "http://lv2plug.in/ns/ext/atom#Vector";
pub const ATOM_ATOM_TRANSFER: &str = "http://lv2plug.in/ns/ext/atom#atomTransfer";
pub const ATOM_EVENT_TRANSFER: &str = "http://lv2plug.in/ns/ext/atom#eventTransfer";

pub const BUF_SIZE_MAX_BLOCK_LENGTH: &str = "http://lv2plug.in/ns/ext/buf-size#maxBlockLength";
pub const BUF_SIZE_MIN_BLOCK_LENGTH: &str = "http://lv2plug.in/ns/ext/buf-size#minBlockLength";
pub const BUF_SIZE_NOMINAL_BLOCK_LENGTH: &str =
    "http://lv2plug.in/ns/ext/buf-size#nominalBlockLength";
pub const BUF_SIZE_SEQUENCE_SIZE: &str = "http://lv2plug.in/ns/ext/buf-size#sequenceSize";

pub const LOG_LOG: &str = "http://lv2plug.in/ns/ext/log#log";
pub const LOG_ERROR: &str = "http://lv2plug.in/ns/ext/log#Error";
pub const LOG_NOTE: &str = "http://lv2plug.in/ns/ext/log#Note";
pub const LOG_TRACE: &str = "http://lv2plug.in/ns/ext/log#Trace";
pub const LOG_WARNING: &str = "http://lv2plug.in/ns/ext/log#Warning";

pub const TIME_POSITION: &str = "http://lv2plug.in/ns/ext/time#Position";
pub const TIME_BAR: &str = "http://lv2plug.in/ns/ext/time#bar";
pub const TIME_BAR_BEAT: &str = "http://lv2plug.in/ns/ext/time#barBeat";
pub const TIME_BEAT: &str = "http://lv2plug.in/ns/ext/time#beat";
pub const TIME_BEAT_UNIT: &str = "http://lv2plug.in/ns/ext/time#beatUnit";
pub const TIME_BEATS_PER_BAR: &str = "http://lv2plug.in/ns/ext/time#beatsPerBar";
pub const TIME_BEATS_PER_MINUTE: &str = "http://lv2plug.in/ns/ext/time#beatsPerMinute";
pub const TIME_FRAME: &str = "http://lv2plug.in/ns/ext/time#frame";
pub const TIME_FRAMES_PER_SECOND: &str = "http://lv2plug.in/ns/ext/time#framesPerSecond";
pub const TIME_SPEED: &str = "http://lv2plug.in/ns/ext/time#speed";
pub const KXSTUDIO_TICKS_PER_BEAT: &str =
    "http://kxstudio.sf.net/ns/lv2ext/props#TimePositionTicksPerBeat";

pub const MIDI_EVENT: &str = "http://lv2plug.in/ns/ext/midi#MidiEvent";
pub const PARAMETERS_SAMPLE_RATE: &str = "http://lv2plug.in/ns/ext/parameters#sampleRate";
pub const UI_WINDOW_TITLE: &str = "http://lv2plug.in/ns/extensions/ui#windowTitle";
pub const CARLA_ATOM_WORKER: &str = "http://kxstudio.sf.net/ns/carla/atomWorker";
pub const KXSTUDIO_TRANSIENT_WINDOW_ID: &str =
    "http://kxstudio.sf.net/ns/lv2ext/props#TransientWindowId";

pub const OPTIONS_OPTIONS: &str = "http://lv2plug.in/ns/ext/options#options";
pub const OPTIONS_INTERFACE: &str = "http://lv2plug.in/ns/ext/options#interface";
pub const PROGRAMS_HOST: &str = "http://kxstudio.sf.net/ns/lv2ext/programs#Host";
pub const PROGRAMS_UI_INTERFACE: &str = "http://kxstudio.sf.net/ns/lv2ext/programs#UIInterface";
pub const STATE_MAKE_PATH: &str = "http://lv2plug.in/ns/ext/state#makePath";
pub const STATE_MAP_PATH: &str = "http://lv2plug.in/ns/ext/state#mapPath";
pub const URI_MAP: &str = "http://lv2plug.in/ns/ext/uri-map";
pub const URID_MAP: &str = "http://lv2plug.in/ns/ext/urid#map";
pub const URID_UNMAP: &str = "http://lv2plug.in/ns/ext/urid#unmap";

pub const UI_IDLE_INTERFACE: &str = "http://lv2plug.in/ns/extensions/ui#idleInterface";
pub const UI_FIXED_SIZE: &str = "http://lv2plug.in/ns/extensions/ui#fixedSize";
pub const UI_MAKE_RESIDENT: &str = "http://lv2plug.in/ns/extensions/ui#makeResident";
pub const UI_MAKE_SONAME_RESIDENT: &str = "http://lv2plug.in/ns/extensions/ui#makeSONameResident";
pub const UI_NO_USER_RESIZE: &str = "http://lv2plug.in/ns/extensions/ui#noUserResize";
pub const UI_PARENT: &str = "http://lv2plug.in/ns/extensions/ui#parent";
pub const UI_PORT_MAP: &str = "http://lv2plug.in/ns/extensions/ui#portMap";
pub const UI_PORT_SUBSCRIBE: &str = "http://lv2plug.in/ns/extensions/ui#portSubscribe";
pub const UI_RESIZE: &str = "http://lv2plug.in/ns/extensions/ui#resize";
pub const UI_TOUCH: &str = "http://lv2plug.in/ns/extensions/ui#touch";

/// Returned by `reverse` for the null id and for ids the table has not seen.
pub const NULL_URI: &str = "urn:null";

/// Fixed URID assignments. Index in [`WELL_KNOWN`] == URID.
pub mod id {
    pub const NULL: u32 = 0;
    pub const ATOM_BLANK: u32 = 1;
    pub const ATOM_BOOL: u32 = 2;
    pub const ATOM_CHUNK: u32 = 3;
    pub const ATOM_DOUBLE: u32 = 4;
    pub const ATOM_EVENT: u32 = 5;
    pub const ATOM_FLOAT: u32 = 6;
    pub const ATOM_INT: u32 = 7;
    pub const ATOM_LITERAL: u32 = 8;
    pub const ATOM_LONG: u32 = 9;
    pub const ATOM_NUMBER: u32 = 10;
    pub const ATOM_OBJECT: u32 = 11;
    pub const ATOM_PATH: u32 = 12;
    pub const ATOM_PROPERTY: u32 = 13;
    pub const ATOM_RESOURCE: u32 = 14;
    pub const ATOM_SEQUENCE: u32 = 15;
    pub const ATOM_SOUND: u32 = 16;
    pub const ATOM_STRING: u32 = 17;
    pub const ATOM_TUPLE: u32 = 18;
    pub const ATOM_URI: u32 = 19;
    pub const ATOM_URID: u32 = 20;
    pub const ATOM_VECTOR: u32 = 21;
    pub const ATOM_TRANSFER_ATOM: u32 = 22;
    pub const ATOM_TRANSFER_EVENT: u32 = 23;
    pub const BUF_MAX_LENGTH: u32 = 24;
    pub const BUF_MIN_LENGTH: u32 = 25;
    pub const BUF_NOMINAL_LENGTH: u32 = 26;
    pub const BUF_SEQUENCE_SIZE: u32 = 27;
    pub const LOG_ERROR: u32 = 28;
    pub const LOG_NOTE: u32 = 29;
    pub const LOG_TRACE: u32 = 30;
    pub const LOG_WARNING: u32 = 31;
    pub const TIME_POSITION: u32 = 32;
    pub const TIME_BAR: u32 = 33;
    pub const TIME_BAR_BEAT: u32 = 34;
    pub const TIME_BEAT: u32 = 35;
    pub const TIME_BEAT_UNIT: u32 = 36;
    pub const TIME_BEATS_PER_BAR: u32 = 37;
    pub const TIME_BEATS_PER_MINUTE: u32 = 38;
    pub const TIME_FRAME: u32 = 39;
    pub const TIME_FRAMES_PER_SECOND: u32 = 40;
    pub const TIME_SPEED: u32 = 41;
    pub const TIME_TICKS_PER_BEAT: u32 = 42;
    pub const MIDI_EVENT: u32 = 43;
    pub const PARAM_SAMPLE_RATE: u32 = 44;
    pub const UI_WINDOW_TITLE: u32 = 45;
    pub const CARLA_ATOM_WORKER: u32 = 46;
    pub const CARLA_TRANSIENT_WINDOW_ID: u32 = 47;
    pub const COUNT: u32 = 48;
}

/// The well-known prefix of the identifier table. Both processes compile the
/// same list, so these ids never need to be negotiated.
pub const WELL_KNOWN: [&str; id::COUNT as usize] = [
    NULL_URI,
    ATOM_BLANK,
    ATOM_BOOL,
    ATOM_CHUNK,
    ATOM_DOUBLE,
    ATOM_EVENT,
    ATOM_FLOAT,
    ATOM_INT,
    ATOM_LITERAL,
    ATOM_LONG,
    ATOM_NUMBER,
    ATOM_OBJECT,
    ATOM_PATH,
    ATOM_PROPERTY,
    ATOM_RESOURCE,
    ATOM_SEQUENCE,
    ATOM_SOUND,
    ATOM_STRING,
    ATOM_TUPLE,
    ATOM_URI,
    ATOM_URID,
    ATOM_VECTOR,
    ATOM_ATOM_TRANSFER,
    ATOM_EVENT_TRANSFER,
    BUF_SIZE_MAX_BLOCK_LENGTH,
    BUF_SIZE_MIN_BLOCK_LENGTH,
    BUF_SIZE_NOMINAL_BLOCK_LENGTH,
    BUF_SIZE_SEQUENCE_SIZE,
    LOG_ERROR,
    LOG_NOTE,
    LOG_TRACE,
    LOG_WARNING,
    TIME_POSITION,
    TIME_BAR,
    TIME_BAR_BEAT,
    TIME_BEAT,
    TIME_BEAT_UNIT,
    TIME_BEATS_PER_BAR,
    TIME_BEATS_PER_MINUTE,
    TIME_FRAME,
    TIME_FRAMES_PER_SECOND,
    TIME_SPEED,
    KXSTUDIO_TICKS_PER_BEAT,
    MIDI_EVENT,
    PARAMETERS_SAMPLE_RATE,
    UI_WINDOW_TITLE,
    CARLA_ATOM_WORKER,
    KXSTUDIO_TRANSIENT_WINDOW_ID,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_layout_matches_ids() {
        assert_eq!(WELL_KNOWN[id::NULL as usize], NULL_URI);
        assert_eq!(WELL_KNOWN[id::ATOM_TRANSFER_EVENT as usize], ATOM_EVENT_TRANSFER);
        assert_eq!(WELL_KNOWN[id::MIDI_EVENT as usize], MIDI_EVENT);
        assert_eq!(WELL_KNOWN[id::PARAM_SAMPLE_RATE as usize], PARAMETERS_SAMPLE_RATE);
        assert_eq!(
            WELL_KNOWN[id::CARLA_TRANSIENT_WINDOW_ID as usize],
            KXSTUDIO_TRANSIENT_WINDOW_ID
        );
    }

    #[test]
    fn well_known_entries_are_unique() {
        let mut sorted = WELL_KNOWN.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), WELL_KNOWN.len());
    }
}
