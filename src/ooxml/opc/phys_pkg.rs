//! Physical (zip) side of an OPC package.
//!
//! Reading inflates every member up front into a map keyed by member name;
//! templates are small and every part of the relationship graph is visited
//! anyway. Writing streams members into a deflated zip held in memory.

use crate::ooxml::opc::error::Result;
use crate::ooxml::opc::packuri::PackURI;
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// All members of a package archive, inflated.
pub struct PhysPkgReader {
    members: HashMap<String, Vec<u8>>,
}

impl PhysPkgReader {
    /// Inflate every file member of a zip archive held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;
        let mut members = HashMap::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut blob = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut blob)?;
            members.insert(name, blob);
        }

        Ok(Self { members })
    }

    /// Take ownership of the blob for a partname, matching member names
    /// case-insensitively as OPC partnames are.
    pub fn take_blob(&mut self, pack_uri: &PackURI) -> Option<Vec<u8>> {
        let name = pack_uri.membername();
        if let Some(blob) = self.members.remove(name) {
            return Some(blob);
        }
        let key = self
            .members
            .keys()
            .find(|member| member.eq_ignore_ascii_case(name))
            .cloned()?;
        self.members.remove(&key)
    }

    pub fn blob_for(&self, pack_uri: &PackURI) -> Option<&[u8]> {
        let name = pack_uri.membername();
        self.members
            .get(name)
            .or_else(|| {
                self.members
                    .iter()
                    .find(|(member, _)| member.eq_ignore_ascii_case(name))
                    .map(|(_, blob)| blob)
            })
            .map(Vec::as_slice)
    }

    /// The `.rels` XML for a source partname, if the package has one.
    pub fn rels_xml_for(&self, source_uri: &PackURI) -> Result<Option<&[u8]>> {
        let rels_uri = source_uri.rels_uri()?;
        Ok(self.blob_for(&rels_uri))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// In-memory zip writer for a package.
pub struct PhysPkgWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl PhysPkgWriter {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    /// Write one member, addressed by partname.
    pub fn write(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        self.zip.start_file(pack_uri.membername(), self.options)?;
        self.zip.write_all(blob)?;
        Ok(())
    }

    /// Finish the central directory and return the archive bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        Ok(self.zip.finish()?.into_inner())
    }
}

impl Default for PhysPkgWriter {
    fn default() -> Self {
        Self::new()
    }
}
