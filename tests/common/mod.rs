use assert_fs::TempDir;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;
use serde_json::json;

/// Write three small photos and a manifest describing them.
///
/// p1 and p2 were taken in Australia in 2020, p3 in New Zealand in 2021.
pub fn setup_manifest(temp_dir: &TempDir) -> ChildPath {
    let photos = temp_dir.child("photos");
    photos.child("p1.jpg").write_str("photo one").unwrap();
    photos.child("p2.jpg").write_str("photo two").unwrap();
    photos.child("p3.jpg").write_str("photo three").unwrap();

    let manifest = temp_dir.child("records.json");
    let entries = json!([
        {
            "path": photos.child("p1.jpg").path(),
            "date": "2020-01-01T09:00:00+10:00",
            "country": "Aus",
            "city": "Bri",
            "city_distance_km": 2.0
        },
        {
            "path": photos.child("p2.jpg").path(),
            "date": "2020-02-01T09:00:00+10:00",
            "country": "Aus",
            "city": "Mel",
            "city_distance_km": 40.0
        },
        {
            "path": photos.child("p3.jpg").path(),
            "date": "2021-01-01T09:00:00+13:00",
            "country": "NZ",
            "city": "Akl"
        }
    ]);
    manifest.write_str(&entries.to_string()).unwrap();
    manifest
}
