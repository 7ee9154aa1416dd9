//! Protocol constants shared by every component.
//!
//! These never change at runtime and never vary across conformant
//! implementations. The header stays fixed across protocol revisions at
//! this major version: the v1.1 additions (BOOLEAN and INTEGER tags) did
//! not bump the framing prefix.

/// Frozen spec version this implementation conforms to.
pub const SPEC_VERSION: &str = "1.1";

/// 5-byte canonical header: ASCII "MAP1" followed by a NUL byte.
pub const CANONICAL_HEADER: &[u8; 5] = b"MAP1\x00";

/// Namespace prefix of the textual identifier form (`map1:<hex>`).
pub const IDENTIFIER_PREFIX: &str = "map1";

// Type tags, one byte each. 0x01-0x04 date from v1.0; 0x05-0x06 were
// added in v1.1 so booleans and integers are distinct from their string
// renderings.

/// STRING: tag, uint32be byte length, UTF-8 bytes.
pub const TAG_STRING: u8 = 0x01;
/// BYTES: tag, uint32be byte length, raw bytes.
pub const TAG_BYTES: u8 = 0x02;
/// LIST: tag, uint32be count, encoded elements in order.
pub const TAG_LIST: u8 = 0x03;
/// MAP: tag, uint32be count, (STRING key, value) pairs in key byte order.
pub const TAG_MAP: u8 = 0x04;
/// BOOLEAN: tag, one payload byte (0x01 true, 0x00 false).
pub const TAG_BOOLEAN: u8 = 0x05;
/// INTEGER: tag, 8 payload bytes, two's-complement big-endian.
pub const TAG_INTEGER: u8 = 0x06;

// Safety limits. Declared counts and lengths are checked against these
// before any corresponding buffer is allocated.

/// Maximum total length of canonical bytes, header included (1 MiB).
pub const MAX_CANONICAL_BYTES: usize = 1_048_576;

/// Maximum nesting depth of LIST/MAP containers. The root container sits
/// at depth 1; scalar children never increase depth.
pub const MAX_DEPTH: u32 = 32;

/// Maximum number of entries in a single MAP.
pub const MAX_MAP_ENTRIES: u32 = 65_535;

/// Maximum number of entries in a single LIST.
pub const MAX_LIST_ENTRIES: u32 = 65_535;
