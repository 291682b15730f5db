//! Integration tests for writing results to NetCDF.

use netcdf::AttributeValue;
use tempfile::tempdir;
use cirrus_io::{IoError, NetcdfStore, ResultStore};

/// Declared variables, coordinates and the global attribute survive a write.
#[test]
fn written_file_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.nc");

    let mut store = NetcdfStore::create(&path).unwrap();
    store.add_dimension("time", vec![6.0, 7.0]).unwrap();
    store.add_dimension("r", vec![0.5, 1.5, 2.5]).unwrap();
    store.add_variable("rdf", &["time", "r"]).unwrap();
    store.add_variable("mean_N", &["time"]).unwrap();
    store.write("rdf", &[1], &[1.0, 2.0, 3.0]).unwrap();
    store.write("mean_N", &[0], &[4.0]).unwrap();
    store.set_attribute("log", "cirrus test").unwrap();
    store.finish().unwrap();

    let file = netcdf::open(&path).unwrap();
    let time = file.variable("time").unwrap().get_values::<f64, _>(..).unwrap();
    assert_eq!(time, vec![6.0, 7.0]);

    let rdf = file.variable("rdf").unwrap().get_values::<f64, _>(..).unwrap();
    assert_eq!(rdf.len(), 6);
    assert!(rdf[..3].iter().all(|v| v.is_nan()));
    assert_eq!(&rdf[3..], &[1.0, 2.0, 3.0]);

    let mean_n = file.variable("mean_N").unwrap().get_values::<f64, _>(..).unwrap();
    assert_eq!(mean_n[0], 4.0);
    assert!(mean_n[1].is_nan());

    let log = file.attribute("log").unwrap().value().unwrap();
    assert!(matches!(log, AttributeValue::Str(ref s) if s == "cirrus test"));
}

/// Writes to undeclared variables fail before anything reaches disk.
#[test]
fn unknown_variable_rejected() {
    let dir = tempdir().unwrap();
    let mut store = NetcdfStore::create(dir.path().join("out.nc")).unwrap();
    store.add_dimension("time", vec![6.0]).unwrap();
    assert!(matches!(
        store.write("rdf", &[0], &[1.0]),
        Err(IoError::UnknownVariable { .. })
    ));
    assert!(!dir.path().join("out.nc").exists());
}
