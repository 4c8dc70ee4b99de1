use std::fs;

use neutronote_data::DataMode;
use neutronote_data::ExperimentId;
use neutronote_data::RunMetadataResolver;
use neutronote_nexus::Dataset;
use neutronote_nexus::UnavailableBackend;
use neutronote_nexus::Value;
use neutronote_nexus::memory::MemoryBackend;
use neutronote_nexus::memory::MemoryContainer;
use pretty_assertions::assert_eq;

use super::fixture::DataRoot;

#[test]
fn unlocatable_run_reports_an_error() -> anyhow::Result<()> {
    let root = DataRoot::new()?;
    let resolver = RunMetadataResolver::new(&root.layout, &UnavailableBackend);

    let meta = resolver.resolve(99999, Some(&root.experiment));
    assert_eq!(
        meta.error(),
        Some("Could not locate file for run 99999 in IPTS-12345")
    );
    assert_eq!(meta.run_number(), 99999);
    assert_eq!(meta.title(), "");
    assert_eq!(meta.duration(), 0.0);
    assert_eq!(meta.total_counts(), 0);

    let meta = resolver.resolve(99999, None);
    assert_eq!(
        meta.error(),
        Some("Could not locate file for run 99999")
    );
    Ok(())
}

#[test]
fn missing_file_is_reported() -> anyhow::Result<()> {
    let root = DataRoot::new()?;
    let resolver = RunMetadataResolver::new(&root.layout, &UnavailableBackend);
    let path = root.root().join("SNAP_1.nxs.h5");

    let meta = resolver.read_file(&path);
    assert_eq!(meta.run_number(), 0);
    let expected = format!("File not found: {}", path.display());
    assert_eq!(meta.error(), Some(expected.as_str()));
    Ok(())
}

#[test]
fn native_is_preferred_over_lite() -> anyhow::Result<()> {
    let root = DataRoot::new()?;
    root.raw_file("IPTS-12345", 64413, DataMode::Lite)?;
    let native = root.raw_file("IPTS-12345", 64413, DataMode::Native)?;
    let lite_only = root.raw_file("IPTS-12345", 64414, DataMode::Lite)?;
    let resolver = RunMetadataResolver::new(&root.layout, &UnavailableBackend);

    assert_eq!(
        resolver.locate_raw_file(64413, Some(&root.experiment)),
        Some(native)
    );
    assert_eq!(
        resolver.locate_raw_file(64414, Some(&root.experiment)),
        Some(lite_only)
    );
    Ok(())
}

#[test]
fn scan_visits_experiments_in_reverse_name_order() -> anyhow::Result<()> {
    let root = DataRoot::new()?;
    root.raw_file("IPTS-1", 7, DataMode::Native)?;
    let newest = root.raw_file("IPTS-2", 7, DataMode::Lite)?;
    let other_prefix = root.root().join("OTHER-9").join("nexus");
    fs::create_dir_all(&other_prefix)?;
    fs::write(other_prefix.join("SNAP_8.nxs.h5"), b"")?;
    let resolver = RunMetadataResolver::new(&root.layout, &UnavailableBackend);

    assert_eq!(resolver.locate_raw_file(7, None), Some(newest));
    assert_eq!(resolver.locate_raw_file(8, None), None);
    Ok(())
}

#[test]
fn given_experiment_is_searched_first() -> anyhow::Result<()> {
    let root = DataRoot::new()?;
    let older = root.raw_file("IPTS-1", 7, DataMode::Native)?;
    root.raw_file("IPTS-2", 7, DataMode::Native)?;
    let resolver = RunMetadataResolver::new(&root.layout, &UnavailableBackend);

    let experiment = ExperimentId::parse("IPTS-1")?;
    assert_eq!(resolver.locate_raw_file(7, Some(&experiment)), Some(older));

    // An experiment without the run falls back to the scan.
    root.raw_file("IPTS-3", 8, DataMode::Native)?;
    assert!(resolver.locate_raw_file(8, Some(&experiment)).is_some());
    Ok(())
}

#[test]
fn metadata_is_read_from_the_raw_file() -> anyhow::Result<()> {
    let root = DataRoot::new()?;
    let path = root.raw_file("IPTS-12345", 64413, DataMode::Native)?;
    fs::write(&path, vec![0_u8; 2048])?;
    let backend = MemoryBackend::new().with_file(
        path.clone(),
        MemoryContainer::new()
            .with_dataset(
                "entry/title",
                Dataset::array(vec![Value::Bytes(b"Vanadium rod".to_vec())]),
            )
            .with_dataset(
                "entry/start_time",
                Dataset::array(vec![Value::Bytes(b"2026-01-30T10:00:00-05:00".to_vec())]),
            )
            .with_dataset(
                "entry/end_time",
                Dataset::array(vec![Value::Bytes(b"2026-01-30T10:00:02-05:00".to_vec())]),
            )
            .with_dataset("entry/duration", Dataset::array(vec![Value::Float(2.0)]))
            .with_dataset(
                "entry/total_counts",
                Dataset::array(vec![Value::UInt(6_000_000)]),
            ),
    );
    let resolver = RunMetadataResolver::new(&root.layout, &backend);

    let meta = resolver.resolve(64413, Some(&root.experiment));
    assert_eq!(meta.error(), None);
    assert_eq!(meta.run_number(), 64413);
    assert_eq!(meta.title(), "Vanadium rod");
    assert_eq!(meta.file_size_bytes(), 2048);
    assert_eq!(meta.file_path(), path.display().to_string());
    assert_eq!(meta.count_rate_display(), "3.000 ME/s");
    assert_eq!(meta.end_time_formatted(), "2026-01-30 10:00:02");
    Ok(())
}

#[test]
fn unreadable_file_keeps_the_parsed_run_number() -> anyhow::Result<()> {
    let root = DataRoot::new()?;
    let path = root.raw_file("IPTS-12345", 64413, DataMode::Lite)?;

    let meta = RunMetadataResolver::new(&root.layout, &UnavailableBackend).read_file(&path);
    assert_eq!(meta.run_number(), 64413);
    assert_eq!(
        meta.error(),
        Some("Error reading file: HDF5 support is not available in this build")
    );

    let meta = RunMetadataResolver::new(&root.layout, &MemoryBackend::new()).read_file(&path);
    assert!(meta.is_error());
    assert_eq!(meta.file_size_bytes(), 0);
    Ok(())
}
