//! Exact (brute-force) L2 index over fixed-dimension vectors.
//!
//! On-disk layout, all little-endian:
//! `b"GBL2"` | `u32` version | `u32` dim | `u64` count | `count * dim` `f32`s.

use std::fs;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{Result, VectorStoreError};

const MAGIC: &[u8; 4] = b"GBL2";
const VERSION: u32 = 1;

/// A search hit: the row position in the index and its squared L2 distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: usize,
    pub distance: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlatL2Index {
    dim: usize,
    data: Vec<f32>,
}

impl FlatL2Index {
    pub fn new(dim: usize) -> Self {
        Self { dim, data: Vec::new() }
    }

    pub fn dim(&self) -> usize { self.dim }

    pub fn len(&self) -> usize {
        if self.dim == 0 { 0 } else { self.data.len() / self.dim }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Append vectors in order. Either all are added or none are.
    pub fn add(&mut self, vectors: &[Vec<f32>]) -> Result<()> {
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dim) {
            return Err(VectorStoreError::DimensionMismatch { expected: self.dim, actual: bad.len() });
        }
        self.data.reserve(vectors.len() * self.dim);
        for v in vectors {
            self.data.extend_from_slice(v);
        }
        Ok(())
    }

    /// The `k` nearest rows to `query`, ascending by distance, ties broken by position.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dim {
            return Err(VectorStoreError::DimensionMismatch { expected: self.dim, actual: query.len() });
        }
        let mut hits: Vec<Neighbor> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(position, row)| Neighbor { position, distance: squared_l2(row, query) })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.position.cmp(&b.position)));
        hits.truncate(k);
        Ok(hits)
    }

    pub fn write_to<W: Write>(&self, mut w: W) -> Result<()> {
        w.write_all(MAGIC)?;
        w.write_all(&VERSION.to_le_bytes())?;
        w.write_all(&(self.dim as u32).to_le_bytes())?;
        w.write_all(&(self.len() as u64).to_le_bytes())?;
        for x in &self.data {
            w.write_all(&x.to_le_bytes())?;
        }
        w.flush()?;
        Ok(())
    }

    pub fn read_from<R: Read>(mut r: R) -> Result<Self> {
        let mut magic = [0u8; 4];
        read_exact(&mut r, &mut magic, "header")?;
        if &magic != MAGIC {
            return Err(VectorStoreError::CorruptIndex(format!("bad magic {:?}", magic)));
        }
        let version = read_u32(&mut r)?;
        if version != VERSION {
            return Err(VectorStoreError::CorruptIndex(format!("unsupported version {}", version)));
        }
        let dim = read_u32(&mut r)? as usize;
        let count = read_u64(&mut r)? as usize;
        let expected_bytes = count
            .checked_mul(dim)
            .and_then(|total| total.checked_mul(4))
            .ok_or_else(|| VectorStoreError::CorruptIndex(format!("{} vectors of dim {} overflow", count, dim)))?;

        let mut bytes = Vec::new();
        r.read_to_end(&mut bytes)?;
        if bytes.len() != expected_bytes {
            return Err(VectorStoreError::CorruptIndex(format!(
                "expected {} bytes of vector data, found {}",
                expected_bytes,
                bytes.len()
            )));
        }
        let data = bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        Ok(Self { dim, data })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        self.write_to(BufWriter::new(fs::File::create(path)?))
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::read_from(BufReader::new(fs::File::open(path)?))
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn read_exact<R: Read>(r: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    r.read_exact(buf).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => VectorStoreError::CorruptIndex(format!("truncated {}", what)),
        _ => VectorStoreError::Io(e),
    })
}

fn read_u32<R: Read>(r: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    read_exact(r, &mut buf, "header")?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u64<R: Read>(r: &mut R) -> Result<u64> {
    let mut buf = [0u8; 8];
    read_exact(r, &mut buf, "header")?;
    Ok(u64::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(rows: &[[f32; 2]]) -> FlatL2Index {
        let mut idx = FlatL2Index::new(2);
        idx.add(&rows.iter().map(|r| r.to_vec()).collect::<Vec<_>>()).unwrap();
        idx
    }

    #[test]
    fn search_orders_by_distance_then_position() {
        let idx = index_of(&[[1.0, 0.0], [0.0, 0.0], [-1.0, 0.0], [3.0, 0.0]]);
        let hits = idx.search(&[0.0, 0.0], 3).unwrap();
        let positions: Vec<usize> = hits.iter().map(|h| h.position).collect();
        assert_eq!(positions, vec![1, 0, 2]);
        assert_eq!(hits[0].distance, 0.0);
        assert_eq!(hits[1].distance, 1.0);
    }

    #[test]
    fn search_caps_at_len_and_handles_zero_k() {
        let idx = index_of(&[[1.0, 1.0], [2.0, 2.0]]);
        assert_eq!(idx.search(&[0.0, 0.0], 10).unwrap().len(), 2);
        assert!(idx.search(&[0.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn add_rejects_wrong_dimension_atomically() {
        let mut idx = index_of(&[[1.0, 1.0]]);
        let err = idx.add(&[vec![0.0, 0.0], vec![1.0, 2.0, 3.0]]).unwrap_err();
        assert!(matches!(err, VectorStoreError::DimensionMismatch { expected: 2, actual: 3 }));
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn bytes_round_trip() {
        let idx = index_of(&[[0.5, -0.25], [1e-3, 42.0]]);
        let mut buf = Vec::new();
        idx.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), 4 + 4 + 4 + 8 + 4 * 4);
        let back = FlatL2Index::read_from(buf.as_slice()).unwrap();
        assert_eq!(back, idx);
    }

    #[test]
    fn oversized_count_in_header_is_corrupt() {
        let mut buf = Vec::new();
        buf.extend_from_slice(MAGIC);
        buf.extend_from_slice(&VERSION.to_le_bytes());
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&(1u64 << 62).to_le_bytes());
        assert!(matches!(FlatL2Index::read_from(buf.as_slice()), Err(VectorStoreError::CorruptIndex(_))));
    }

    #[test]
    fn empty_index_ignores_query_dimension() {
        let idx = FlatL2Index::new(4);
        assert!(idx.search(&[1.0, 2.0], 3).unwrap().is_empty());
        let full = index_of(&[[1.0, 1.0]]);
        assert!(matches!(full.search(&[1.0], 1), Err(VectorStoreError::DimensionMismatch { expected: 2, actual: 1 })));
    }

    #[test]
    fn truncated_or_foreign_files_are_corrupt() {
        let idx = index_of(&[[0.5, -0.25]]);
        let mut buf = Vec::new();
        idx.write_to(&mut buf).unwrap();
        buf.pop();
        assert!(matches!(FlatL2Index::read_from(buf.as_slice()), Err(VectorStoreError::CorruptIndex(_))));
        assert!(matches!(FlatL2Index::read_from(&b"FAISS"[..]), Err(VectorStoreError::CorruptIndex(_))));
        assert!(matches!(FlatL2Index::read_from(&b"GB"[..]), Err(VectorStoreError::CorruptIndex(_))));
    }
}
