//! Magic-number sniffing for native binaries.
//!
//! The loader never hands a file to the platform's dynamic linker unless its
//! header matches the binary format of the current platform. Wrong-platform
//! artifacts left next to the right one are skipped instead of crashing the
//! host process.

const MACH_O_64_MAGIC: [u8; 4] = [0xCF, 0xFA, 0xED, 0xFE];
const ELF_MAGIC: [u8; 4] = [0x7F, b'E', b'L', b'F'];
const DOS_MAGIC: [u8; 2] = [b'M', b'Z'];
const PE_SIGNATURE: [u8; 4] = [b'P', b'E', 0x00, 0x00];

/// Bytes needed to reach the PE signature through the DOS stub.
pub const PE_HEADER_WINDOW: usize = 516;
const MAGIC_WINDOW: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryFormat {
    MachO,
    Elf,
    Pe,
}

impl BinaryFormat {
    pub fn for_platform(platform: &str) -> Option<Self> {
        match platform {
            "darwin" => Some(BinaryFormat::MachO),
            "linux" => Some(BinaryFormat::Elf),
            "win32" => Some(BinaryFormat::Pe),
            _ => None,
        }
    }

    /// Number of leading bytes to read before calling [`BinaryFormat::matches`].
    pub fn header_len(self) -> usize {
        match self {
            BinaryFormat::Pe => PE_HEADER_WINDOW,
            BinaryFormat::MachO | BinaryFormat::Elf => MAGIC_WINDOW,
        }
    }

    pub fn matches(self, header: &[u8]) -> bool {
        match self {
            BinaryFormat::MachO => header.starts_with(&MACH_O_64_MAGIC),
            BinaryFormat::Elf => header.starts_with(&ELF_MAGIC),
            BinaryFormat::Pe => {
                let window = &header[..header.len().min(PE_HEADER_WINDOW)];
                window.starts_with(&DOS_MAGIC)
                    && window.windows(PE_SIGNATURE.len()).any(|w| w == PE_SIGNATURE)
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BinaryFormat::MachO => "Mach-O",
            BinaryFormat::Elf => "ELF",
            BinaryFormat::Pe => "PE",
        }
    }
}

/// Checks a header against the signature expected for `platform`.
/// Platforms without a known signature never match.
pub fn signature_matches(platform: &str, header: &[u8]) -> bool {
    BinaryFormat::for_platform(platform).is_some_and(|format| format.matches(header))
}
