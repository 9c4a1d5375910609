//! Row encoding and id allocation helpers shared by storage modules.

use super::tables::SEQUENCES;
use crate::error::AppError;
use redb::{MultimapTable, ReadableMultimapTable, ReadableTable, Table, WriteTransaction};
use serde::{de::DeserializeOwned, Serialize};

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, AppError> {
    Ok(bincode::serialize(value)?)
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    Ok(bincode::deserialize(bytes)?)
}

/// Allocate the next id for `kind` inside `txn`.
///
/// Ids start at 1 and are never reused, even after deletes.
pub(crate) fn next_id(txn: &WriteTransaction, kind: &str) -> Result<u64, AppError> {
    let mut sequences = txn.open_table(SEQUENCES)?;
    let last = sequences.get(kind)?.map(|guard| guard.value()).unwrap_or(0);
    let next = last
        .checked_add(1)
        .ok_or_else(|| AppError::StorageMessage(format!("Id sequence '{}' exhausted", kind)))?;
    sequences.insert(kind, next)?;
    Ok(next)
}

pub(crate) fn load_row<T, K>(table: &K, id: u64) -> Result<Option<T>, AppError>
where
    T: DeserializeOwned,
    K: ReadableTable<u64, &'static [u8]>,
{
    match table.get(id)? {
        Some(guard) => Ok(Some(decode(guard.value())?)),
        None => Ok(None),
    }
}

pub(crate) fn store_row<T: Serialize>(
    table: &mut Table<u64, &'static [u8]>,
    id: u64,
    value: &T,
) -> Result<(), AppError> {
    let encoded = encode(value)?;
    table.insert(id, encoded.as_slice())?;
    Ok(())
}

/// Collect all values stored under `key` in a multimap, in ascending order.
pub(crate) fn members<M>(table: &M, key: u64) -> Result<Vec<u64>, AppError>
where
    M: ReadableMultimapTable<u64, u64>,
{
    let mut out = Vec::new();
    for item in table.get(key)? {
        out.push(item?.value());
    }
    Ok(out)
}

/// Insert `a -> b` into `forward` and `b -> a` into `reverse`.
///
/// # Returns
/// `true` when the pair was newly added.
pub(crate) fn link(
    forward: &mut MultimapTable<u64, u64>,
    reverse: &mut MultimapTable<u64, u64>,
    a: u64,
    b: u64,
) -> Result<bool, AppError> {
    let existed = forward.insert(a, b)?;
    reverse.insert(b, a)?;
    Ok(!existed)
}

/// Remove `a -> b` from `forward` and `b -> a` from `reverse`.
///
/// # Returns
/// `true` when the pair was present.
pub(crate) fn unlink(
    forward: &mut MultimapTable<u64, u64>,
    reverse: &mut MultimapTable<u64, u64>,
    a: u64,
    b: u64,
) -> Result<bool, AppError> {
    let removed = forward.remove(a, b)?;
    reverse.remove(b, a)?;
    Ok(removed)
}
