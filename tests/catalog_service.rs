//! Catalog service contract over the in-memory store

use serde_json::{json, Value};
use std::sync::Arc;
use std::thread;
use volume_catalog::{CatalogService, Error, MemStore};

fn volume_json(barcode: &str) -> Value {
    json!({
        "barcode": barcode,
        "media_type": "LTO8",
        "capacity": 12_000_000_000_000u64,
        "used": 0,
        "blocksize": 65536,
        "priority": 1,
        "label_time": "2024-03-01T12:00:00Z",
        "modify_time": "2024-03-01T12:00:00Z",
        "mount_time": "2024-03-01T12:00:00Z",
        "needs_attention": false,
        "in_use": false,
        "labeled": false,
        "media_bad": false,
        "cleaning_media": false,
        "write_protect": false,
        "readonly": false,
        "draining": false,
        "unavailable": false,
        "full": false
    })
}

fn service() -> CatalogService {
    CatalogService::new(Arc::new(MemStore::new()))
}

#[test]
fn test_create_then_get_round_trip() {
    let svc = service();
    let body = volume_json("B001");

    let created = svc.create_volume(body.to_string().as_bytes()).unwrap();
    let fetched = svc.get_volume("B001").unwrap();
    assert_eq!(created, fetched);
    assert_eq!(serde_json::to_value(&fetched).unwrap(), body);
}

#[test]
fn test_duplicate_create_is_conflict() {
    let svc = service();
    svc.create_volume(volume_json("B001").to_string().as_bytes())
        .unwrap();

    let mut dup = volume_json("B001");
    dup["media_type"] = json!("LTO9");
    let err = svc.create_volume(dup.to_string().as_bytes()).unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
    assert_eq!(svc.get_volume("B001").unwrap().media_type, "LTO8");
}

#[test]
fn test_update_replaces_fully() {
    let svc = service();
    svc.create_volume(volume_json("B001").to_string().as_bytes())
        .unwrap();

    let mut next = volume_json("B001");
    next["used"] = json!(5_000_000_000_000u64);
    next["in_use"] = json!(true);
    next["draining"] = json!(true);
    next["priority"] = json!(-3);
    next["mount_time"] = json!("2024-06-01T08:30:00Z");

    let updated = svc
        .update_volume("B001", next.to_string().as_bytes())
        .unwrap();
    let fetched = svc.get_volume("B001").unwrap();
    assert_eq!(updated, fetched);
    assert_eq!(serde_json::to_value(&fetched).unwrap(), next);

    // and back again: fields return to their defaults, nothing is merged
    svc.update_volume("B001", volume_json("B001").to_string().as_bytes())
        .unwrap();
    assert_eq!(
        serde_json::to_value(svc.get_volume("B001").unwrap()).unwrap(),
        volume_json("B001")
    );
}

#[test]
fn test_update_missing_volume() {
    let svc = service();
    let err = svc
        .update_volume("B404", volume_json("B404").to_string().as_bytes())
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert!(svc.list_volumes().unwrap().is_empty());
}

#[test]
fn test_delete_then_get_is_not_found() {
    let svc = service();
    let body = volume_json("B001").to_string();
    svc.create_volume(body.as_bytes()).unwrap();

    svc.delete_volume("B001", body.as_bytes()).unwrap();
    assert!(matches!(svc.get_volume("B001"), Err(Error::NotFound(_))));

    let err = svc.delete_volume("B001", body.as_bytes()).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_list_completeness() {
    let svc = service();
    let n = 25;
    for i in 0..n {
        let body = volume_json(&format!("VOL{:03}", i));
        svc.create_volume(body.to_string().as_bytes()).unwrap();
    }

    let volumes = svc.list_volumes().unwrap();
    assert_eq!(volumes.len(), n);
    for (i, vol) in volumes.iter().enumerate() {
        assert_eq!(
            serde_json::to_value(vol).unwrap(),
            volume_json(&format!("VOL{:03}", i))
        );
    }
}

#[test]
fn test_malformed_input_never_mutates() {
    let svc = service();
    let original = volume_json("B001");
    svc.create_volume(original.to_string().as_bytes()).unwrap();

    let bad_bodies: Vec<Vec<u8>> = vec![
        b"".to_vec(),
        b"{".to_vec(),
        b"[]".to_vec(),
        br#"{"barcode": "B002"}"#.to_vec(),
        {
            let mut v = volume_json("B001");
            v["used"] = json!("lots");
            v.to_string().into_bytes()
        },
    ];

    for body in &bad_bodies {
        assert!(matches!(svc.create_volume(body), Err(Error::Validation(_))));
        assert!(matches!(
            svc.update_volume("B001", body),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            svc.delete_volume("B001", body),
            Err(Error::Validation(_))
        ));
    }

    let volumes = svc.list_volumes().unwrap();
    assert_eq!(volumes.len(), 1);
    assert_eq!(serde_json::to_value(&volumes[0]).unwrap(), original);
}

#[test]
fn test_flags_are_not_constrained() {
    let svc = service();
    let mut body = volume_json("B001");
    for flag in [
        "needs_attention",
        "in_use",
        "labeled",
        "media_bad",
        "cleaning_media",
        "write_protect",
        "readonly",
        "draining",
        "unavailable",
        "full",
    ] {
        body[flag] = json!(true);
    }

    let vol = svc.create_volume(body.to_string().as_bytes()).unwrap();
    assert!(vol.in_use && vol.draining && vol.full && vol.read_only);
}

#[test]
fn test_concurrent_creates_on_distinct_barcodes() {
    let svc = service();
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let svc = svc.clone();
            thread::spawn(move || {
                for i in 0..20 {
                    let body = volume_json(&format!("T{}-{:02}", t, i));
                    svc.create_volume(body.to_string().as_bytes()).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(svc.list_volumes().unwrap().len(), 160);
}

#[test]
fn test_concurrent_duplicate_create_has_one_winner() {
    let svc = service();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let svc = svc.clone();
            thread::spawn(move || {
                svc.create_volume(volume_json("B001").to_string().as_bytes())
                    .is_ok()
            })
        })
        .collect();
    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(winners, 1);
    assert_eq!(svc.list_volumes().unwrap().len(), 1);
}
