// src/store/widen.rs

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::{fs, io::Write, path::Path};
use tempfile::NamedTempFile;
use tracing::debug;

/// Rewrite `path` under `header`, which must be the file's current header
/// followed by `added` new columns. Every historical row gets an empty cell
/// for each new column; rows shorter than the old header are padded first.
///
/// The file is streamed `chunk_rows` records at a time into a temporary
/// file next to it, which is then renamed over the original, so readers
/// see either the old file or the widened one. Returns the number of
/// historical rows rewritten.
pub fn widen_file(path: &Path, header: &[String], added: usize, chunk_rows: usize) -> Result<u64> {
    if added > header.len() {
        bail!("cannot add {added} columns under a header of {}", header.len());
    }
    let old_width = header.len() - added;
    let chunk_rows = chunk_rows.max(1);

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut rows = 0u64;
    {
        let mut wtr = WriterBuilder::new().from_writer(&mut tmp);
        wtr.write_record(header)
            .context("writing widened header")?;

        let mut chunk: Vec<StringRecord> = Vec::with_capacity(chunk_rows);
        for record in rdr.records() {
            let record = record.with_context(|| format!("reading {}", path.display()))?;
            chunk.push(record);
            if chunk.len() == chunk_rows {
                rows += write_chunk(&mut wtr, &chunk, old_width, added, rows)?;
                chunk.clear();
            }
        }
        rows += write_chunk(&mut wtr, &chunk, old_width, added, rows)?;
        wtr.flush().context("flushing widened file")?;
    }
    tmp.as_file()
        .sync_all()
        .context("syncing widened file")?;

    // temporary files are created owner-only; keep the table's own mode
    let permissions = fs::metadata(path)
        .with_context(|| format!("reading permissions of {}", path.display()))?
        .permissions();
    tmp.as_file()
        .set_permissions(permissions)
        .with_context(|| format!("copying permissions of {}", path.display()))?;

    tmp.persist(path)
        .with_context(|| format!("replacing {} with widened copy", path.display()))?;
    debug!(path = %path.display(), rows, added, "widened");
    Ok(rows)
}

fn write_chunk<W: Write>(
    wtr: &mut csv::Writer<W>,
    chunk: &[StringRecord],
    old_width: usize,
    added: usize,
    offset: u64,
) -> Result<u64> {
    for (i, record) in chunk.iter().enumerate() {
        if record.len() > old_width {
            bail!(
                "row {} has {} fields but the header has {}",
                offset + i as u64 + 2,
                record.len(),
                old_width
            );
        }
        let padding = old_width - record.len() + added;
        let fields = record.iter().chain(std::iter::repeat("").take(padding));
        wtr.write_record(fields)
            .context("writing widened row")?;
    }
    Ok(chunk.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn adds_empty_cells_across_chunks() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("out.csv");
        let mut text = String::from("Month,E\n");
        for i in 0..7 {
            text.push_str(&format!("{:02},{i}.5\n", i + 1));
        }
        fs::write(&path, text).unwrap();

        let rows = widen_file(&path, &header(&["Month", "E", "G", "H"]), 2, 3).unwrap();
        assert_eq!(rows, 7);

        let out = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "Month,E,G,H");
        assert_eq!(lines[1], "01,0.5,,");
        assert_eq!(lines[7], "07,6.5,,");
    }

    #[test]
    fn pads_short_rows_and_keeps_quoting() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("out.csv");
        fs::write(&path, "Month,Weather Scenario,E\n01,\"a,b\"\n02,c,3.0\n").unwrap();

        widen_file(&path, &header(&["Month", "Weather Scenario", "E", "G"]), 1, 10).unwrap();
        let out = fs::read_to_string(&path).unwrap();
        assert_eq!(
            out,
            "Month,Weather Scenario,E,G\n01,\"a,b\",,\n02,c,3.0,\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn keeps_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempdir().unwrap();
        let path = tmp.path().join("out.csv");
        fs::write(&path, "Month,E\n01,1.0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        widen_file(&path, &header(&["Month", "E", "G"]), 1, 10).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn rejects_rows_wider_than_header() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("out.csv");
        fs::write(&path, "Month,E\n01,1,2\n").unwrap();
        let original = fs::read(&path).unwrap();

        assert!(widen_file(&path, &header(&["Month", "E", "G"]), 1, 10).is_err());
        // the original is untouched when the rewrite fails
        assert_eq!(fs::read(&path).unwrap(), original);
    }
}
