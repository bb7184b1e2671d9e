/*!
loader.rs - Program-image loaders: raw binary, Intel HEX, Motorola S-record.

Overview
========
`read_program` translates an image file into bus writes. Loaders run before
execution starts and report typed errors; nothing in here can fail once the
processor is stepping.

Format notes (bit-exact):
- Raw binary: bytes written sequentially from the base address.
- Intel HEX: `:LLAAAATT<data>CC` records; type 00 loads data, type 01 ends
  the file, anything else is a format error. Checksums are not verified.
- Motorola S-record: `S<t>LL<addr><data>CC`; S1/S2/S3 load (16/24/32-bit
  addresses), S0/S5/S7/S8/S9 are skipped, S4 is reserved and rejected.
  Checksums are not verified.

For HEX and S-records the base address is an offset added to each record's
load address (0 leaves record addresses untouched); addresses wrap into the
64 KiB space.
*/

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::bus::Bus;

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Bin,
    IntelHex,
    SRec,
}

/// Loader failure, one variant family per format.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("image i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("intel hex, line {line}: {reason}")]
    IntelHex { line: usize, reason: String },
    #[error("s-record, line {line}: {reason}")]
    SRec { line: usize, reason: String },
}

/// What a successful load did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadInfo {
    /// Data bytes written to memory.
    pub bytes: usize,
    /// Records processed (1 for raw binaries).
    pub records: usize,
}

/// Load `path` into memory through the bus.
pub fn read_program(
    bus: &mut Bus,
    path: &Path,
    format: Format,
    base: u16,
) -> Result<LoadInfo, LoadError> {
    let info = match format {
        Format::Bin => {
            let data = fs::read(path)?;
            bus.load_bytes(base, &data);
            LoadInfo {
                bytes: data.len(),
                records: 1,
            }
        }
        Format::IntelHex => load_intel_hex(bus, &fs::read_to_string(path)?, base)?,
        Format::SRec => load_srec(bus, &fs::read_to_string(path)?, base)?,
    };
    log::info!(
        "loaded {} as {format:?}: {} bytes in {} records (base {base:#06x})",
        path.display(),
        info.bytes,
        info.records
    );
    Ok(info)
}

/// Parse Intel HEX text and write data records through the bus.
pub fn load_intel_hex(bus: &mut Bus, text: &str, base: u16) -> Result<LoadInfo, LoadError> {
    let mut info = LoadInfo {
        bytes: 0,
        records: 0,
    };
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let err = |reason: &str| LoadError::IntelHex {
            line,
            reason: reason.to_string(),
        };
        let rec = raw.trim();
        if rec.is_empty() {
            continue;
        }
        let body = rec.strip_prefix(':').ok_or_else(|| err("missing ':' start code"))?;
        let bytes = decode_hex(body).ok_or_else(|| err("invalid hex digits"))?;
        // count + addr(2) + type + checksum
        if bytes.len() < 5 {
            return Err(err("record too short"));
        }
        let count = bytes[0] as usize;
        if bytes.len() != count + 5 {
            return Err(err("length field does not match record size"));
        }
        let addr = (bytes[1] as u16) << 8 | bytes[2] as u16;
        match bytes[3] {
            0x00 => {
                for (k, &b) in bytes[4..4 + count].iter().enumerate() {
                    bus.write(base.wrapping_add(addr).wrapping_add(k as u16), b);
                }
                info.bytes += count;
                info.records += 1;
            }
            0x01 => {
                info.records += 1;
                break;
            }
            t => return Err(err(&format!("unsupported record type {t:02X}"))),
        }
        // Checksum byte present but deliberately not verified.
    }
    Ok(info)
}

/// Parse Motorola S-record text and write S1/S2/S3 payloads through the bus.
pub fn load_srec(bus: &mut Bus, text: &str, base: u16) -> Result<LoadInfo, LoadError> {
    let mut info = LoadInfo {
        bytes: 0,
        records: 0,
    };
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let err = |reason: &str| LoadError::SRec {
            line,
            reason: reason.to_string(),
        };
        let rec = raw.trim();
        if rec.is_empty() {
            continue;
        }
        let body = rec.strip_prefix('S').ok_or_else(|| err("missing 'S' start code"))?;
        if body.is_empty() {
            return Err(err("record too short"));
        }
        let (type_ch, rest) = body.split_at(1);
        let bytes = decode_hex(rest).ok_or_else(|| err("invalid hex digits"))?;
        if bytes.is_empty() {
            return Err(err("record too short"));
        }
        let count = bytes[0] as usize;
        if bytes.len() != count + 1 {
            return Err(err("length field does not match record size"));
        }
        let addr_len = match type_ch {
            "1" => 2,
            "2" => 3,
            "3" => 4,
            "0" | "5" | "7" | "8" | "9" => {
                info.records += 1;
                continue; // header / counts / entry points carry no data
            }
            "4" => return Err(err("reserved record type S4")),
            _ => return Err(err("unknown record type")),
        };
        // count covers address + data + checksum
        if count < addr_len + 1 {
            return Err(err("record shorter than its address field"));
        }
        let mut addr = 0u32;
        for &b in &bytes[1..1 + addr_len] {
            addr = addr << 8 | b as u32;
        }
        let data = &bytes[1 + addr_len..count]; // trailing byte is the checksum
        for (k, &b) in data.iter().enumerate() {
            let dest = (base as u32 + addr + k as u32) & 0xFFFF;
            bus.write(dest as u16, b);
        }
        info.bytes += data.len();
        info.records += 1;
    }
    Ok(info)
}

/// Decode a string of hex digit pairs; `None` on odd length or bad digits.
fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    s.as_bytes()
        .chunks(2)
        .map(|pair| {
            let hi = (pair[0] as char).to_digit(16)?;
            let lo = (pair[1] as char).to_digit(16)?;
            Some((hi << 4 | lo) as u8)
        })
        .collect()
}
