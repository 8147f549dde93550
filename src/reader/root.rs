use std::path::Path;

use log::{debug, trace};
use oxyroot::{Branch, Named, ReaderTree, RootFile, Slice};

use crate::columns::Jagged;

use super::{ColumnSource, ReadError, EVENTS_TREE};

/// Column types we know how to read
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum LeafType {
    F32,
    F64,
    I32,
    U32,
    I64,
    U64,
    I16,
    U16,
    U8,
    Bool,
}

impl LeafType {
    fn of(branch: &Branch) -> Option<Self> {
        use LeafType::*;
        let name = branch.item_type_name().to_ascii_lowercase();
        // strip array dimensions like `float[nJet]`
        let name = name.split('[').next().unwrap_or_default().trim();
        let ty = match name {
            "float" | "float_t" | "float32_t" => F32,
            "double" | "double_t" | "double32_t" => F64,
            "int" | "int_t" | "int32_t" => I32,
            "unsigned int" | "uint_t" | "uint32_t" => U32,
            "long" | "long64_t" | "int64_t" => I64,
            "unsigned long" | "ulong64_t" | "uint64_t" => U64,
            "short" | "short_t" | "int16_t" => I16,
            "unsigned short" | "ushort_t" | "uint16_t" => U16,
            "unsigned char" | "uchar_t" | "uint8_t" => U8,
            "bool" | "bool_t" => Bool,
            _ => return None,
        };
        Some(ty)
    }
}

/// Columns of the `Events` tree in a ROOT file
pub struct RootSource {
    tree: ReaderTree,
}

impl RootSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReadError> {
        let path = path.as_ref();
        debug!("Opening {path:?}");
        let mut file = RootFile::open(path).map_err(|err| ReadError::Open {
            path: path.display().to_string(),
            msg: err.to_string(),
        })?;
        let tree = file.get_tree(EVENTS_TREE).map_err(|err| ReadError::Open {
            path: path.display().to_string(),
            msg: format!("no tree `{EVENTS_TREE}`: {err}"),
        })?;
        Ok(Self { tree })
    }

    /// Number of entries in the tree
    pub fn nevents(&self) -> usize {
        self.tree.entries().try_into().unwrap_or_default()
    }

    fn branch(&self, name: &str) -> Result<(&Branch, LeafType), ReadError> {
        let branch = self
            .tree
            .branches()
            .find(|b| b.name() == name)
            .ok_or_else(|| ReadError::MissingBranch(name.to_owned()))?;
        let ty = LeafType::of(branch).ok_or_else(|| {
            ReadError::UnsupportedType {
                branch: name.to_owned(),
                ty: branch.item_type_name(),
            }
        })?;
        trace!("Branch {name} has type {ty:?}");
        Ok((branch, ty))
    }
}

// the oxyroot error type is not public
fn branch_error<E: std::fmt::Display>(branch: &str, err: E) -> ReadError {
    ReadError::Branch {
        branch: branch.to_owned(),
        msg: err.to_string(),
    }
}

macro_rules! read_scalars {
    ($branch:expr, $name:expr, $t:ty) => {
        $branch
            .as_iter::<$t>()
            .map_err(|err| branch_error($name, err))?
            .map(|v| v as f64)
            .collect()
    };
}

macro_rules! read_jagged {
    ($branch:expr, $name:expr, $t:ty) => {
        $branch
            .as_iter::<Slice<$t>>()
            .map_err(|err| branch_error($name, err))?
            .map(|v| v.into_vec().into_iter().map(|v| v as f64).collect())
            .collect()
    };
}

impl ColumnSource for RootSource {
    fn has(&self, name: &str) -> bool {
        self.tree.branches().any(|b| b.name() == name)
    }

    fn scalars(&mut self, name: &str) -> Result<Vec<f64>, ReadError> {
        use LeafType::*;
        let (branch, ty) = self.branch(name)?;
        let values = match ty {
            F32 => read_scalars!(branch, name, f32),
            F64 => read_scalars!(branch, name, f64),
            I32 => read_scalars!(branch, name, i32),
            U32 => read_scalars!(branch, name, u32),
            I64 => read_scalars!(branch, name, i64),
            U64 => read_scalars!(branch, name, u64),
            I16 => read_scalars!(branch, name, i16),
            U16 => read_scalars!(branch, name, u16),
            U8 => read_scalars!(branch, name, u8),
            Bool => branch
                .as_iter::<bool>()
                .map_err(|err| branch_error(name, err))?
                .map(|v| if v { 1. } else { 0. })
                .collect(),
        };
        Ok(values)
    }

    fn jagged_with_counts(
        &mut self,
        name: &str,
        counts: &[usize],
    ) -> Result<Jagged<f64>, ReadError> {
        use LeafType::*;
        let (branch, ty) = self.branch(name)?;
        let nested: Vec<Vec<f64>> = match ty {
            F32 => read_jagged!(branch, name, f32),
            F64 => read_jagged!(branch, name, f64),
            I32 => read_jagged!(branch, name, i32),
            U32 => read_jagged!(branch, name, u32),
            I64 => read_jagged!(branch, name, i64),
            U64 => read_jagged!(branch, name, u64),
            I16 => read_jagged!(branch, name, i16),
            U16 => read_jagged!(branch, name, u16),
            U8 => read_jagged!(branch, name, u8),
            Bool => {
                return Err(ReadError::UnsupportedType {
                    branch: name.to_owned(),
                    ty: "bool[]".to_owned(),
                })
            }
        };
        debug!("Read {} events from {name}", nested.len());
        Ok(Jagged::from_nested(name, counts, nested)?)
    }
}
