use crate::diagnostics::Field;
use crate::error::{Error, Result};
use crate::header::{PackageInfo, MAX_PAYLOAD_LEN};
use crate::layout::{HeaderRevision, HEADER_LEN};
use std::io::{Read, Write};

//===========================================================================//

/// A whole g1a file: a header followed by the binary payload.
#[derive(Clone, Debug)]
pub struct G1aFile {
    info: PackageInfo,
    payload: Vec<u8>,
}

impl G1aFile {
    /// Creates a package around the given payload.
    pub fn new(info: PackageInfo, payload: Vec<u8>) -> G1aFile {
        G1aFile { info, payload }
    }

    /// Returns the header content.
    pub fn info(&self) -> &PackageInfo {
        &self.info
    }

    /// Returns the binary payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Returns the size of the file as written, header included.
    pub fn total_size(&self) -> u64 {
        (HEADER_LEN + self.payload.len()) as u64
    }

    /// Reads a g1a file into memory, validating its header against the
    /// number of bytes actually read.
    pub fn read<R: Read>(
        mut reader: R,
        revision: HeaderRevision,
    ) -> Result<G1aFile> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        let parsed = PackageInfo::decode(&data, data.len() as u64, revision)?;
        let payload = data.split_off(HEADER_LEN);
        Ok(G1aFile { info: parsed.info, payload })
    }

    /// Writes the header and then the payload.  Returns the fields that had to
    /// be truncated to fit the header.
    pub fn write<W: Write>(
        &self,
        mut writer: W,
        revision: HeaderRevision,
    ) -> Result<Vec<Field>> {
        let payload_size = match u32::try_from(self.payload.len()) {
            Ok(size) if size <= MAX_PAYLOAD_LEN => size,
            _ => return Err(Error::PayloadTooLarge(self.payload.len() as u64)),
        };
        let encoded = self.info.encode(payload_size, revision);
        writer.write_all(&encoded.bytes)?;
        writer.write_all(&self.payload)?;
        log::debug!(
            "wrote {} byte package for {:?}",
            self.total_size(),
            self.info.program_name
        );
        Ok(encoded.truncated)
    }
}

//===========================================================================//


//===========================================================================//
