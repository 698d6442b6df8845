//! Behavioural tests for the sled-backed repository adapters.
//!
//! Exercises the adapters through the same port traits the handlers
//! use, including survival of records across a store reopen.

use backend::domain::{
    AccountRepository, EmailAddress, LicensePlate, Make, Model, PasswordHash, PersonName,
    Registration, RegistrationRepository, SearchQuery, StoreError, UserAccount, Vehicle,
    VehicleChanges, VehicleRepository,
};
use backend::domain::{OwnerAddress, OwnerName, YearOfManufacture};
use backend::outbound::persistence::{
    DocumentStore, SledAccountRepository, SledRegistrationRepository, SledVehicleRepository,
};
use tempfile::TempDir;

fn corolla() -> Vehicle {
    Vehicle::new(
        Make::new("Toyota").expect("valid make"),
        Model::new("Corolla").expect("valid model"),
        LicensePlate::new("A123BC77").expect("valid plate"),
    )
}

fn plate(raw: &str) -> LicensePlate {
    LicensePlate::new(raw).expect("valid plate")
}

#[tokio::test]
async fn vehicle_insert_is_unique_per_plate() {
    let dir = TempDir::new().expect("temp dir");
    let store = DocumentStore::open(dir.path()).expect("store opens");
    let repo = SledVehicleRepository::new(&store).expect("collection opens");

    repo.insert(&corolla()).await.expect("first insert");
    let second = Vehicle::new(
        Make::new("Honda").expect("valid make"),
        Model::new("Civic").expect("valid model"),
        plate("A123BC77"),
    );
    let err = repo.insert(&second).await.expect_err("duplicate plate");
    assert!(matches!(err, StoreError::Duplicate { .. }));
}

#[tokio::test]
async fn vehicles_survive_a_store_reopen() {
    let dir = TempDir::new().expect("temp dir");
    {
        let store = DocumentStore::open(dir.path()).expect("store opens");
        let repo = SledVehicleRepository::new(&store).expect("collection opens");
        repo.insert(&corolla()).await.expect("insert");
    }

    let store = DocumentStore::open(dir.path()).expect("store reopens");
    let repo = SledVehicleRepository::new(&store).expect("collection opens");
    let vehicles = repo.list().await.expect("list");
    assert_eq!(vehicles.len(), 1);
    assert_eq!(vehicles[0].license_plate().as_ref(), "A123BC77");
}

#[tokio::test]
async fn vehicle_update_merges_and_delete_removes() {
    let dir = TempDir::new().expect("temp dir");
    let store = DocumentStore::open(dir.path()).expect("store opens");
    let repo = SledVehicleRepository::new(&store).expect("collection opens");
    repo.insert(&corolla()).await.expect("insert");

    let changes = VehicleChanges {
        make: None,
        model: Some(Model::new("Camry").expect("valid model")),
    };
    let modified = repo.update(&plate("A123BC77"), &changes).await.expect("update");
    assert!(modified);

    let modified = repo.update(&plate("A123BC77"), &changes).await.expect("update");
    assert!(!modified, "identical values report no modification");

    repo.delete(&plate("A123BC77")).await.expect("delete");
    let err = repo
        .delete(&plate("A123BC77"))
        .await
        .expect_err("already removed");
    assert!(matches!(err, StoreError::Missing { .. }));
}

#[tokio::test]
async fn registration_search_is_case_insensitive() {
    let dir = TempDir::new().expect("temp dir");
    let store = DocumentStore::open(dir.path()).expect("store opens");
    let repo = SledRegistrationRepository::new(&store).expect("collection opens");

    let registration = Registration::new(
        plate("A123BC77"),
        OwnerName::new("Ivan Petrov").expect("valid name"),
        OwnerAddress::new("12 Main St.").expect("valid address"),
        YearOfManufacture::new(2005).expect("valid year"),
    );
    repo.insert(&registration).await.expect("insert");

    let hits = repo.search(&SearchQuery::new("PETROV")).await.expect("search");
    assert_eq!(hits.len(), 1);

    let misses = repo.search(&SearchQuery::new("sidorov")).await.expect("search");
    assert!(misses.is_empty());

    let empty = repo.search(&SearchQuery::new("  ")).await.expect("search");
    assert!(empty.is_empty(), "blank query matches nothing");
}

#[tokio::test]
async fn accounts_are_keyed_by_email() {
    let dir = TempDir::new().expect("temp dir");
    let store = DocumentStore::open(dir.path()).expect("store opens");
    let repo = SledAccountRepository::new(&store).expect("collection opens");

    let account = UserAccount::new(
        PersonName::new("Ada", "first_name").expect("valid name"),
        PersonName::new("Lovelace", "last_name").expect("valid name"),
        EmailAddress::new("ada@example.com").expect("valid email"),
        PasswordHash::from_phc_string("$argon2id$v=19$stub"),
    );
    repo.insert(&account).await.expect("insert");

    let found = repo
        .find_by_email(&EmailAddress::new("ada@example.com").expect("valid email"))
        .await
        .expect("lookup")
        .expect("account present");
    assert_eq!(found.email().as_ref(), "ada@example.com");

    let missing = repo
        .find_by_email(&EmailAddress::new("nobody@example.com").expect("valid email"))
        .await
        .expect("lookup");
    assert!(missing.is_none());

    let duplicate = UserAccount::new(
        PersonName::new("Augusta", "first_name").expect("valid name"),
        PersonName::new("King", "last_name").expect("valid name"),
        EmailAddress::new("ADA@example.com").expect("valid email"),
        PasswordHash::from_phc_string("$argon2id$v=19$stub"),
    );
    let err = repo.insert(&duplicate).await.expect_err("duplicate email");
    assert!(matches!(err, StoreError::Duplicate { .. }));
}
