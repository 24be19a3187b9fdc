// SPDX-FileCopyrightText: Copyright (c) 2017-2024 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{
    borrow::Cow,
    fmt::{self, Display},
};

use crate::{bytes::Bytes, node::NodeAddress};

/// Size of the FINS frame header in bytes.
pub const HEADER_LEN: usize = 10;

/// Minimum size of a response frame: header, command, sub-command and the
/// two end code bytes.
pub const MIN_RESPONSE_LEN: usize = HEADER_LEN + 4;

/// ICF value of a command frame (response required).
pub const ICF_COMMAND: u8 = 0x80;

/// ICF bit that marks a frame as a response.
pub const ICF_RESPONSE_BIT: u8 = 0x40;

/// Gateway count stamped into outgoing command headers.
pub const GATEWAY_COUNT: u8 = 0x02;

/// A 16-bit controller data item, transmitted big-endian.
pub type Word = u16;

/// A single bit within a memory word.
pub type Bit = bool;

/// Word offset within a memory area.
pub type Address = u16;

/// Index of a bit within a word, `0..=15`.
pub type BitIndex = u8;

/// Number of items to read or write.
pub type Quantity = u16;

/// One-byte correlation token associating a response with its request.
pub type ServiceId = u8;

/// A FINS command code: the command byte and the sub-command byte.
///
/// Values follow the FINS protocol specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandCode {
    /// 0x01/0x01 Memory Area Read
    MemoryAreaRead,

    /// 0x01/0x02 Memory Area Write
    MemoryAreaWrite,

    /// 0x01/0x03 Memory Area Fill
    MemoryAreaFill,

    /// 0x01/0x04 Multiple Memory Area Read
    MultipleMemoryAreaRead,

    /// 0x01/0x05 Memory Area Transfer
    MemoryAreaTransfer,

    /// 0x02/0x01 Parameter Area Read
    ParameterAreaRead,

    /// 0x02/0x02 Parameter Area Write
    ParameterAreaWrite,

    /// 0x04/0x01 Run
    Run,

    /// 0x04/0x02 Stop
    Stop,

    /// 0x05/0x01 CPU Unit Data Read
    CpuUnitDataRead,

    /// 0x05/0x02 Connection Data Read
    ConnectionDataRead,

    /// 0x06/0x01 CPU Unit Status Read
    CpuUnitStatusRead,

    /// 0x06/0x20 Cycle Time Read
    CycleTimeRead,

    /// 0x23/0x01 Forced Set/Reset
    ForceSetReset,

    /// 0x23/0x02 Forced Set/Reset Cancel
    ForceSetResetCancel,

    /// Any other command/sub-command pair.
    Custom(u8, u8),
}

impl CommandCode {
    /// Create a new [`CommandCode`] from the command and sub-command bytes.
    #[must_use]
    pub const fn new(command: u8, sub_command: u8) -> Self {
        match (command, sub_command) {
            (0x01, 0x01) => Self::MemoryAreaRead,
            (0x01, 0x02) => Self::MemoryAreaWrite,
            (0x01, 0x03) => Self::MemoryAreaFill,
            (0x01, 0x04) => Self::MultipleMemoryAreaRead,
            (0x01, 0x05) => Self::MemoryAreaTransfer,
            (0x02, 0x01) => Self::ParameterAreaRead,
            (0x02, 0x02) => Self::ParameterAreaWrite,
            (0x04, 0x01) => Self::Run,
            (0x04, 0x02) => Self::Stop,
            (0x05, 0x01) => Self::CpuUnitDataRead,
            (0x05, 0x02) => Self::ConnectionDataRead,
            (0x06, 0x01) => Self::CpuUnitStatusRead,
            (0x06, 0x20) => Self::CycleTimeRead,
            (0x23, 0x01) => Self::ForceSetReset,
            (0x23, 0x02) => Self::ForceSetResetCancel,
            (command, sub_command) => Self::Custom(command, sub_command),
        }
    }

    /// Gets the command and sub-command bytes of the current [`CommandCode`].
    #[must_use]
    pub const fn value(self) -> (u8, u8) {
        match self {
            Self::MemoryAreaRead => (0x01, 0x01),
            Self::MemoryAreaWrite => (0x01, 0x02),
            Self::MemoryAreaFill => (0x01, 0x03),
            Self::MultipleMemoryAreaRead => (0x01, 0x04),
            Self::MemoryAreaTransfer => (0x01, 0x05),
            Self::ParameterAreaRead => (0x02, 0x01),
            Self::ParameterAreaWrite => (0x02, 0x02),
            Self::Run => (0x04, 0x01),
            Self::Stop => (0x04, 0x02),
            Self::CpuUnitDataRead => (0x05, 0x01),
            Self::ConnectionDataRead => (0x05, 0x02),
            Self::CpuUnitStatusRead => (0x06, 0x01),
            Self::CycleTimeRead => (0x06, 0x20),
            Self::ForceSetReset => (0x23, 0x01),
            Self::ForceSetResetCancel => (0x23, 0x02),
            Self::Custom(command, sub_command) => (command, sub_command),
        }
    }
}

impl Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (command, sub_command) = self.value();
        write!(f, "0x{command:02X}/0x{sub_command:02X}")
    }
}

/// A controller memory area, identified by a one-byte code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryArea {
    /// 0x02 Data Memory (DM)
    DataMemory,

    /// 0x05 Condition Flags
    ConditionFlag,

    /// 0x07 Clock Pulses
    ClockPulse,

    /// 0x09 Timer/Counter Area
    TimerCounter,

    /// 0x20 Extended Data Memory (EM)
    ExtendedMemory,

    /// 0x30 CIO Area (I/O relays)
    Cio,

    /// 0x31 Work Area (internal relays)
    Work,

    /// 0x32 Holding Area (holding relays)
    Holding,

    /// 0x33 Auxiliary Area (auxiliary relays)
    Auxiliary,

    /// 0x46 Task Flags
    TaskFlag,

    /// 0x47 Task Status
    TaskStatus,

    /// Any other area code.
    Custom(u8),
}

impl MemoryArea {
    /// Create a new [`MemoryArea`] with `value`.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        match value {
            0x02 => Self::DataMemory,
            0x05 => Self::ConditionFlag,
            0x07 => Self::ClockPulse,
            0x09 => Self::TimerCounter,
            0x20 => Self::ExtendedMemory,
            0x30 => Self::Cio,
            0x31 => Self::Work,
            0x32 => Self::Holding,
            0x33 => Self::Auxiliary,
            0x46 => Self::TaskFlag,
            0x47 => Self::TaskStatus,
            code => Self::Custom(code),
        }
    }

    /// Gets the [`u8`] value of the current [`MemoryArea`].
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::DataMemory => 0x02,
            Self::ConditionFlag => 0x05,
            Self::ClockPulse => 0x07,
            Self::TimerCounter => 0x09,
            Self::ExtendedMemory => 0x20,
            Self::Cio => 0x30,
            Self::Work => 0x31,
            Self::Holding => 0x32,
            Self::Auxiliary => 0x33,
            Self::TaskFlag => 0x46,
            Self::TaskStatus => 0x47,
            Self::Custom(code) => code,
        }
    }
}

impl Display for MemoryArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.value())
    }
}

/// Location of a word or a single bit inside a controller memory area.
///
/// Word-level access uses `bit == 0`; bit-level access addresses one of the
/// 16 bits within the word at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryAddress {
    /// Memory area the address points into.
    pub area: MemoryArea,
    /// Word offset within the area.
    pub offset: Address,
    /// Bit index within the word, `0..=15`; `0` for word access.
    pub bit: BitIndex,
}

impl MemoryAddress {
    /// Address of a whole word.
    #[must_use]
    pub const fn word(area: MemoryArea, offset: Address) -> Self {
        Self {
            area,
            offset,
            bit: 0,
        }
    }

    /// Address of a single bit within a word.
    #[must_use]
    pub const fn bit(area: MemoryArea, offset: Address, bit: BitIndex) -> Self {
        Self { area, offset, bit }
    }
}

impl Display for MemoryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}.{}", self.area, self.offset, self.bit)
    }
}

/// The 10-byte FINS frame header.
///
/// Field order on the wire: ICF, RSV, GCT, DNA, DA1, DA2, SNA, SA1, SA2, SID.
/// Headers are created per request and immutable once sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Information control field.
    pub icf: u8,
    /// Reserved byte, `0x00` on outgoing frames.
    pub reserved: u8,
    /// Number of gateways the frame is allowed to pass.
    pub gateway_count: u8,
    /// Destination network/node/unit (DNA, DA1, DA2).
    pub destination: NodeAddress,
    /// Source network/node/unit (SNA, SA1, SA2).
    pub source: NodeAddress,
    /// Correlation token, unique per in-flight request of a session.
    pub service_id: ServiceId,
}

impl Header {
    /// Creates a command header addressed from `source` to `destination`.
    #[must_use]
    pub const fn command(
        destination: NodeAddress,
        source: NodeAddress,
        service_id: ServiceId,
    ) -> Self {
        Self {
            icf: ICF_COMMAND,
            reserved: 0x00,
            gateway_count: GATEWAY_COUNT,
            destination,
            source,
            service_id,
        }
    }

    /// Whether the ICF marks this frame as a response.
    #[must_use]
    pub const fn is_response(&self) -> bool {
        self.icf & ICF_RESPONSE_BIT != 0
    }
}

/// A typed memory operation sent from the client to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request<'a> {
    /// Read `Quantity` consecutive words starting at the given offset.
    ReadWords(MemoryArea, Address, Quantity),

    /// Write consecutive words starting at the given offset.
    WriteWords(MemoryArea, Address, Cow<'a, [Word]>),

    /// Read `Quantity` consecutive bits starting at the given word offset
    /// and bit index.
    ReadBits(MemoryArea, Address, BitIndex, Quantity),

    /// Write consecutive bits starting at the given word offset and bit
    /// index.
    WriteBits(MemoryArea, Address, BitIndex, Cow<'a, [Bit]>),

    /// Read the CPU unit status; the reply payload is opaque status data.
    ReadCpuStatus,

    /// A raw FINS request.
    /// The first parameter is the command code.
    /// The second parameter is the raw payload of the request.
    Custom(CommandCode, Cow<'a, [u8]>),
}

impl Request<'_> {
    /// Converts the request into an owned instance with `'static` lifetime.
    #[must_use]
    pub fn into_owned(self) -> Request<'static> {
        use Request::*;

        match self {
            ReadWords(area, addr, qty) => ReadWords(area, addr, qty),
            WriteWords(area, addr, words) => WriteWords(area, addr, Cow::Owned(words.into_owned())),
            ReadBits(area, addr, bit, qty) => ReadBits(area, addr, bit, qty),
            WriteBits(area, addr, bit, bits) => {
                WriteBits(area, addr, bit, Cow::Owned(bits.into_owned()))
            }
            ReadCpuStatus => ReadCpuStatus,
            Custom(code, payload) => Custom(code, Cow::Owned(payload.into_owned())),
        }
    }

    /// Get the [`CommandCode`] of the [`Request`].
    #[must_use]
    pub const fn command_code(&self) -> CommandCode {
        use Request::*;

        match self {
            ReadWords(_, _, _) | ReadBits(_, _, _, _) => CommandCode::MemoryAreaRead,
            WriteWords(_, _, _) | WriteBits(_, _, _, _) => CommandCode::MemoryAreaWrite,
            ReadCpuStatus => CommandCode::CpuUnitStatusRead,
            Custom(code, _) => *code,
        }
    }
}

/// A complete outgoing frame: header plus typed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFrame<'a> {
    /// Frame header, stamped by the transport.
    pub header: Header,
    /// The typed operation.
    pub request: Request<'a>,
}

/// A decoded response frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Echoed frame header.
    pub header: Header,
    /// Echoed command code.
    pub command: CommandCode,
    /// Completion status reported by the controller.
    pub end_code: EndCode,
    /// Raw payload bytes beyond the end code, empty if none.
    pub payload: Bytes,
}

/// Main response class of a FINS end code.
///
/// Values follow the FINS protocol specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainCode {
    /// 0x00
    Normal,
    /// 0x01
    LocalNodeError,
    /// 0x02
    DestinationNodeError,
    /// 0x03
    ControllerError,
    /// 0x04
    ServiceUnsupported,
    /// 0x05
    RoutingTableError,
    /// 0x10
    CommandFormatError,
    /// 0x11
    ParameterError,
    /// 0x20
    ReadNotPossible,
    /// 0x21
    WriteNotPossible,
    /// 0x22
    NotExecutableInCurrentMode,
    /// 0x23
    NoSuchUnit,
    /// 0x25
    UnitError,
    /// 0x26
    CommandError,
    /// 0x30
    AccessRightError,
    /// 0x40
    Abort,
    /// None of the above.
    Custom(u8),
}

impl MainCode {
    /// Create a new [`MainCode`] with `value`.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        match value {
            0x00 => Self::Normal,
            0x01 => Self::LocalNodeError,
            0x02 => Self::DestinationNodeError,
            0x03 => Self::ControllerError,
            0x04 => Self::ServiceUnsupported,
            0x05 => Self::RoutingTableError,
            0x10 => Self::CommandFormatError,
            0x11 => Self::ParameterError,
            0x20 => Self::ReadNotPossible,
            0x21 => Self::WriteNotPossible,
            0x22 => Self::NotExecutableInCurrentMode,
            0x23 => Self::NoSuchUnit,
            0x25 => Self::UnitError,
            0x26 => Self::CommandError,
            0x30 => Self::AccessRightError,
            0x40 => Self::Abort,
            other => Self::Custom(other),
        }
    }

    /// Gets the [`u8`] value of the current [`MainCode`].
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Normal => 0x00,
            Self::LocalNodeError => 0x01,
            Self::DestinationNodeError => 0x02,
            Self::ControllerError => 0x03,
            Self::ServiceUnsupported => 0x04,
            Self::RoutingTableError => 0x05,
            Self::CommandFormatError => 0x10,
            Self::ParameterError => 0x11,
            Self::ReadNotPossible => 0x20,
            Self::WriteNotPossible => 0x21,
            Self::NotExecutableInCurrentMode => 0x22,
            Self::NoSuchUnit => 0x23,
            Self::UnitError => 0x25,
            Self::CommandError => 0x26,
            Self::AccessRightError => 0x30,
            Self::Abort => 0x40,
            Self::Custom(code) => code,
        }
    }

    pub(crate) fn description(&self) -> &str {
        match *self {
            Self::Normal => "Normal completion",
            Self::LocalNodeError => "Local node error",
            Self::DestinationNodeError => "Destination node error",
            Self::ControllerError => "Controller error",
            Self::ServiceUnsupported => "Service unsupported",
            Self::RoutingTableError => "Routing table error",
            Self::CommandFormatError => "Command format error",
            Self::ParameterError => "Parameter error",
            Self::ReadNotPossible => "Read not possible",
            Self::WriteNotPossible => "Write not possible",
            Self::NotExecutableInCurrentMode => "Not executable in current mode",
            Self::NoSuchUnit => "No such unit",
            Self::UnitError => "Unit error",
            Self::CommandError => "Command error",
            Self::AccessRightError => "Access right error",
            Self::Abort => "Abort",
            Self::Custom(_) => "Custom",
        }
    }
}

/// Completion status of a response: main response code plus sub code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndCode {
    /// Main response class.
    pub main: MainCode,
    /// Sub code qualifying the main class, `0x00` on success.
    pub sub: u8,
}

impl EndCode {
    /// Create a new [`EndCode`] from the raw main and sub bytes.
    #[must_use]
    pub const fn new(main: u8, sub: u8) -> Self {
        Self {
            main: MainCode::new(main),
            sub,
        }
    }

    /// Whether the response reports normal completion.
    ///
    /// Only the combination of main code `0x00` and sub code `0x00` counts
    /// as success; everything else is a protocol-level failure.
    #[must_use]
    pub const fn is_normal(self) -> bool {
        matches!(self.main, MainCode::Normal) && self.sub == 0x00
    }
}

impl Display for EndCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{:02X}/0x{:02X} ({})",
            self.main.value(),
            self.sub,
            self.main.description()
        )
    }
}
