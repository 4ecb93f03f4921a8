use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use burn::tensor::backend::Backend;
use parquet::basic::{Repetition, Type as PhysicalType};
use parquet::data_type::{Decimal, FloatType, Int64Type};
use parquet::file::properties::WriterProperties;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::file::writer::SerializedFileWriter;
use parquet::record::Field;
use parquet::schema::types::Type;
use stk_core::volume::Volume;
use stk_core::{Result, StkError};

use crate::layout::TableLayout;

/// Read a volume of known `shape` from one Parquet table.
///
/// Rows are read in file order; within a row every non-index column is taken
/// in schema order. The concatenated samples must number exactly
/// `shape[0] * shape[1] * shape[2]` and are reshaped row-major. Null cells
/// become NaN.
pub fn read_volume<B: Backend, P: AsRef<Path>>(
    path: P,
    shape: [usize; 3],
    layout: &TableLayout,
    device: &B::Device,
) -> Result<Volume<B>> {
    let path = path.as_ref();
    let mut values = Vec::new();
    append_table(path, layout, &mut values)?;
    tracing::info!("Read {} samples from {}", values.len(), path.display());
    Volume::from_vec(values, shape, device)
}

/// Read a volume of known `shape` from every table matching `pattern`.
///
/// Matching files are sorted by path and concatenated in that order before
/// reshaping.
pub fn read_volume_glob<B: Backend>(
    pattern: &str,
    shape: [usize; 3],
    layout: &TableLayout,
    device: &B::Device,
) -> Result<Volume<B>> {
    let paths = matching_paths(pattern)?;
    tracing::info!("Pattern {} matched {} files", pattern, paths.len());

    let mut values = Vec::new();
    for path in &paths {
        append_table(path, layout, &mut values)?;
    }
    Volume::from_vec(values, shape, device)
}

/// Write `volume` as one row per `(inline, crossline)` pair.
///
/// Up to two index columns are written, named after the first entries of
/// `layout`, holding the inline and crossline index. Each time sample gets its
/// own `FLOAT` column named by its index, so [`read_volume`] with the same
/// layout and shape reproduces the volume.
pub fn write_volume<B: Backend, P: AsRef<Path>>(
    path: P,
    volume: &Volume<B>,
    layout: &TableLayout,
) -> Result<()> {
    let path = path.as_ref();
    let [d, h, w] = volume.shape();
    let samples = volume.to_vec()?;
    let index_names: Vec<&str> = layout.index_columns.iter().take(2).map(String::as_str).collect();

    let mut fields = Vec::with_capacity(index_names.len() + w);
    for name in &index_names {
        fields.push(primitive_field(name, PhysicalType::INT64).map_err(|e| StkError::io(path, e))?);
    }
    for k in 0..w {
        fields.push(primitive_field(&k.to_string(), PhysicalType::FLOAT).map_err(|e| StkError::io(path, e))?);
    }
    let schema = Type::group_type_builder("volume")
        .with_fields(fields)
        .build()
        .map_err(|e| StkError::io(path, e))?;

    let file = File::create(path).map_err(|e| StkError::io(path, e))?;
    let props = Arc::new(WriterProperties::builder().build());
    let mut writer =
        SerializedFileWriter::new(file, Arc::new(schema), props).map_err(|e| StkError::io(path, e))?;

    let rows = d * h;
    let inline_index: Vec<i64> = (0..rows).map(|r| (r / h) as i64).collect();
    let crossline_index: Vec<i64> = (0..rows).map(|r| (r % h) as i64).collect();

    let mut row_group = writer.next_row_group().map_err(|e| StkError::io(path, e))?;
    let mut column = 0;
    while let Some(mut col_writer) = row_group.next_column().map_err(|e| StkError::io(path, e))? {
        let written = if column < index_names.len() {
            let index = if column == 0 { &inline_index } else { &crossline_index };
            col_writer.typed::<Int64Type>().write_batch(index, None, None)
        } else {
            let k = column - index_names.len();
            let values: Vec<f32> = (0..rows).map(|r| samples[r * w + k]).collect();
            col_writer.typed::<FloatType>().write_batch(&values, None, None)
        };
        written.map_err(|e| StkError::io(path, e))?;
        col_writer.close().map_err(|e| StkError::io(path, e))?;
        column += 1;
    }
    row_group.close().map_err(|e| StkError::io(path, e))?;
    writer.close().map_err(|e| StkError::io(path, e))?;

    tracing::info!("Wrote {}x{}x{} volume to {}", d, h, w, path.display());
    Ok(())
}

fn primitive_field(name: &str, physical: PhysicalType) -> parquet::errors::Result<Arc<Type>> {
    Type::primitive_type_builder(name, physical)
        .with_repetition(Repetition::REQUIRED)
        .build()
        .map(Arc::new)
}

/// Expand a glob pattern into a sorted, non-empty list of files.
fn matching_paths(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries = glob::glob(pattern).map_err(|e| StkError::io(pattern, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| StkError::io(e.path().to_path_buf(), e.error()))?;
        if path.is_file() {
            paths.push(path);
        }
    }
    if paths.is_empty() {
        return Err(StkError::io(pattern, "no files match pattern"));
    }
    paths.sort();
    Ok(paths)
}

/// Append every data cell of the table at `path` to `values`.
fn append_table(path: &Path, layout: &TableLayout, values: &mut Vec<f32>) -> Result<()> {
    let file = File::open(path).map_err(|e| StkError::io(path, e))?;
    let reader = SerializedFileReader::new(file).map_err(|e| StkError::io(path, e))?;

    let metadata = reader.metadata().file_metadata();
    let num_rows = metadata.num_rows();
    let num_columns = metadata.schema_descr().num_columns();
    tracing::debug!("Reading {} rows x {} columns from {}", num_rows, num_columns, path.display());
    values.reserve(usize::try_from(num_rows).unwrap_or(0).saturating_mul(num_columns));

    let rows = reader.get_row_iter(None).map_err(|e| StkError::io(path, e))?;
    for row in rows {
        let row = row.map_err(|e| StkError::io(path, e))?;
        for (name, field) in row.get_column_iter() {
            if layout.is_index(name) {
                continue;
            }
            let value = field_to_f32(field).ok_or_else(|| {
                StkError::data_format(path, name.as_str(), format!("non-numeric cell {}", field))
            })?;
            values.push(value);
        }
    }
    Ok(())
}

/// Numeric cell as `f32`; null is a missing sample.
///
/// Booleans, strings, bytes and temporal types are not samples.
fn field_to_f32(field: &Field) -> Option<f32> {
    let value = match field {
        Field::Null => f32::NAN,
        Field::Byte(v) => *v as f32,
        Field::Short(v) => *v as f32,
        Field::Int(v) => *v as f32,
        Field::Long(v) => *v as f32,
        Field::UByte(v) => *v as f32,
        Field::UShort(v) => *v as f32,
        Field::UInt(v) => *v as f32,
        Field::ULong(v) => *v as f32,
        Field::Float16(v) => f32::from(*v),
        Field::Float(v) => *v,
        Field::Double(v) => *v as f32,
        Field::Decimal(v) => return decimal_to_f32(v),
        _ => return None,
    };
    Some(value)
}

/// Unscaled big-endian two's complement integer divided by `10^scale`.
fn decimal_to_f32(decimal: &Decimal) -> Option<f32> {
    let bytes = decimal.data();
    if bytes.is_empty() || bytes.len() > 16 {
        return None;
    }
    let fill = if bytes[0] & 0x80 != 0 { 0xFF } else { 0x00 };
    let mut buf = [fill; 16];
    buf[16 - bytes.len()..].copy_from_slice(bytes);
    let unscaled = i128::from_be_bytes(buf);
    Some((unscaled as f64 / 10f64.powi(decimal.scale())) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;
    use tempfile::tempdir;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_field_conversion() {
        assert_eq!(field_to_f32(&Field::Int(-3)), Some(-3.0));
        assert_eq!(field_to_f32(&Field::Double(2.5)), Some(2.5));
        assert!(field_to_f32(&Field::Null).unwrap().is_nan());
        assert_eq!(field_to_f32(&Field::Bool(true)), None);
        assert_eq!(field_to_f32(&Field::Str("x".to_string())), None);
    }

    #[test]
    fn test_decimal_conversion() {
        assert_eq!(decimal_to_f32(&Decimal::from_i32(125, 9, 2)), Some(1.25));
        assert_eq!(decimal_to_f32(&Decimal::from_i64(-31_400, 18, 4)), Some(-3.14));
        assert_eq!(decimal_to_f32(&Decimal::from_bytes(vec![0xFF, 0x38].into(), 4, 1)), Some(-20.0));
        assert_eq!(field_to_f32(&Field::Decimal(Decimal::from_i32(7, 3, 0))), Some(7.0));
    }

    #[test]
    fn test_oversized_shape_reports_missing_file() {
        let device = Default::default();
        let result = read_volume::<TestBackend, _>(
            "/non/existent/volume.parquet",
            [usize::MAX / 2, 3, 1],
            &TableLayout::default(),
            &device,
        );
        assert!(matches!(result, Err(StkError::Io { .. })));
    }

    #[test]
    fn test_write_read_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("volume.parquet");
        let device = Default::default();

        let values: Vec<f32> = (0..(3 * 4 * 5)).map(|v| v as f32 * 0.5 - 7.0).collect();
        let volume = Volume::<TestBackend>::from_vec(values.clone(), [3, 4, 5], &device).unwrap();

        let layout = TableLayout::default();
        write_volume(&file_path, &volume, &layout).unwrap();
        let loaded = read_volume::<TestBackend, _>(&file_path, [3, 4, 5], &layout, &device).unwrap();

        assert_eq!(loaded.shape(), [3, 4, 5]);
        assert_eq!(loaded.to_vec().unwrap(), values);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let device = Default::default();
        let result = read_volume::<TestBackend, _>(
            "/non/existent/volume.parquet",
            [1, 1, 1],
            &TableLayout::default(),
            &device,
        );
        assert!(matches!(result, Err(StkError::Io { .. })));
    }

    #[test]
    fn test_unmatched_glob_is_io_error() {
        let dir = tempdir().unwrap();
        let pattern = format!("{}/*.parquet", dir.path().display());
        let result = matching_paths(&pattern);
        assert!(matches!(result, Err(StkError::Io { .. })));
    }
}
