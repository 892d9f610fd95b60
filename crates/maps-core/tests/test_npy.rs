use maps_core::error::MapsError;
use maps_core::io::npy::{load_array, load_mask, save_array, save_mask};
use ndarray::{array, Array2, Array3};

#[test]
fn test_existing_file_is_left_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("offset.npy");
    std::fs::write(&path, b"keep me").unwrap();

    let err = save_array(&array![[1.0f64, 2.0]], &path).unwrap_err();
    assert!(matches!(err, MapsError::PathAlreadyInUse(p) if p == path));
    assert_eq!(std::fs::read(&path).unwrap(), b"keep me");
}

#[test]
fn test_array_is_reloaded_with_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planes.npy");
    let planes = Array3::from_shape_fn((2, 3, 4), |(k, i, j)| (k * 100 + i * 10 + j) as f64);
    save_array(&planes, &path).unwrap();

    let loaded: Array3<f64> = load_array(&path).unwrap();
    assert_eq!(loaded, planes);
}

#[test]
fn test_transposed_view_is_saved_in_logical_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.npy");
    let a = array![[1.0f64, 2.0, 3.0], [4.0, 5.0, 6.0]];
    save_array(&a.t(), &path).unwrap();

    let loaded: Array2<f64> = load_array(&path).unwrap();
    assert_eq!(loaded, a.t());
}

#[test]
fn test_wrong_dimensionality() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flat.npy");
    save_array(&array![1.0f64, 2.0, 3.0], &path).unwrap();
    assert!(matches!(
        load_array::<f64, ndarray::Ix2>(&path),
        Err(MapsError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.npy");
    assert!(matches!(
        load_array::<f64, ndarray::Ix2>(&path),
        Err(MapsError::FileNotFound(_))
    ));
}

#[test]
fn test_mask_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mask.npy");
    let mask = array![[true, false, true], [false, false, true]];
    save_mask(&mask, &path).unwrap();

    let raw: Array2<u8> = load_array(&path).unwrap();
    assert_eq!(raw, array![[1u8, 0, 1], [0, 0, 1]]);
    assert_eq!(load_mask(&path).unwrap(), mask);
}
