//! Record Store benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use identity_core::ids::new_user_id;
use identity_core::model::{Email, Meta, User, USER_SCHEMA};
use record_store::UserStore;

fn sample_user() -> User {
    User {
        schemas: vec![USER_SCHEMA.to_string()],
        id: new_user_id(),
        user_name: new_user_id(),
        given_name: None,
        family_name: None,
        formatted_name: None,
        active: true,
        emails: vec![Email {
            value: "user@example.com".to_string(),
            primary: Some(true),
            r#type: None,
        }],
        groups: vec![],
        department: None,
        risk_score: 0,
        password: None,
        meta: Meta {
            resource_type: "User".to_string(),
            created: chrono::Utc::now(),
            last_modified: chrono::Utc::now(),
            location: "/scim/v2/Users".to_string(),
        },
    }
}

fn benchmark_store(c: &mut Criterion) {
    let store = UserStore::new();
    for _ in 0..1000 {
        store.insert_new(sample_user(), || unreachable!()).unwrap();
    }
    let probe = store.insert_new(sample_user(), || unreachable!()).unwrap();

    c.bench_function("user_store_get", |b| b.iter(|| black_box(store.get(&probe.id))));
    c.bench_function("user_store_list_all", |b| b.iter(|| black_box(store.list_all().len())));
}

criterion_group!(benches, benchmark_store);
criterion_main!(benches);
