//! End-to-end tests of [`OdooClient`] over HTTP against an in-process Odoo.

mod common;

use common::FakeOdoo;
use odoo_api::{
    Credentials, Domain, ErrorKind, OdooClient, OdooConfig, Operator, ReadOptions,
    SearchOptions, SearchReadOptions, Value, Values,
};
use serde::Deserialize;

fn name(value: &str) -> Values {
    Values::from([("name".to_owned(), Value::from(value))])
}

#[tokio::test]
async fn test_partner_lifecycle() {
    let (odoo, addr) = FakeOdoo::start().await;
    let client = OdooClient::new(FakeOdoo::config(addr)).unwrap();

    let ids = client
        .search(
            "res.partner",
            &Domain::new().with("id", Operator::Eq, 1),
            SearchOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(ids, [1]);

    let partners = client
        .read("res.partner", &ids, ReadOptions::default())
        .await
        .unwrap();
    assert_eq!(partners[0].get("name"), Some(&Value::from("OceanTech")));

    let partners = client
        .search_and_read(
            "res.partner",
            &Domain::new().with("id", Operator::Eq, 1),
            SearchReadOptions::default().with_fields(["name"]),
        )
        .await
        .unwrap();
    assert_eq!(partners.len(), 1);
    assert!(partners[0].get("email").is_none());

    let id = client.create("res.partner", name("test")).await.unwrap();
    assert!(client.update("res.partner", &[id], name("abc")).await.unwrap());

    let renamed = client
        .read("res.partner", &[id], ReadOptions::default().with_fields(["name"]))
        .await
        .unwrap();
    assert_eq!(renamed[0].get("name"), Some(&Value::from("abc")));

    assert!(client.delete("res.partner", &[id]).await.unwrap());
    let remaining = client
        .search(
            "res.partner",
            &Domain::new().with("id", Operator::Eq, id),
            SearchOptions::default(),
        )
        .await
        .unwrap();
    assert!(remaining.is_empty());

    assert_eq!(
        odoo.calls(),
        ["search", "read", "search_read", "create", "write", "read", "unlink", "search"]
    );
}

#[tokio::test]
async fn test_typed_records() {
    #[derive(Debug, Deserialize)]
    struct Partner {
        id: i64,
        name: String,
        #[serde(deserialize_with = "odoo_api::deserialize_odoo_nullable")]
        email: Option<String>,
    }

    let (_odoo, addr) = FakeOdoo::start().await;
    let client = OdooClient::new(FakeOdoo::config(addr)).unwrap();

    let partners: Vec<Partner> = client
        .read_as("res.partner", &[1], ReadOptions::default())
        .await
        .unwrap();

    assert_eq!(partners[0].id, 1);
    assert_eq!(partners[0].name, "OceanTech");
    assert!(partners[0].email.is_none());
}

#[tokio::test]
async fn test_version_and_login() {
    let (_odoo, addr) = FakeOdoo::start().await;
    let config = OdooConfig {
        user: None,
        password: None,
        ..FakeOdoo::config(addr)
    };

    let client = OdooClient::login(config.clone(), common::LOGIN, common::PASSWORD)
        .await
        .unwrap();
    assert_eq!(client.credentials().user_id, common::USER_ID);
    assert_eq!(client.version().await.unwrap().server_version, "17.0");

    let anonymous = OdooConfig {
        database: None,
        ..config.clone()
    };
    let version = OdooClient::server_version(&anonymous).await.unwrap();
    assert_eq!(version.protocol_version, 1);

    let error = OdooClient::login(config, common::LOGIN, "wrong")
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Authentication);
}

#[tokio::test]
async fn test_faults_are_classified() {
    let (_odoo, addr) = FakeOdoo::start().await;
    let client = OdooClient::new(FakeOdoo::config(addr)).unwrap();

    let error = client
        .read("res.partner", &[999], ReadOptions::default())
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert!(error.fault().is_some());

    let error = client
        .search("res.nothing", &Domain::new(), SearchOptions::default())
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::ExternalError);

    let intruder = OdooClient::with_provider(
        Credentials::new(common::DATABASE, common::USER_ID, "wrong"),
        odoo_api::provider::ReqwestProvider::new(&FakeOdoo::config(addr)).unwrap(),
    );
    let error = intruder.delete("res.partner", &[1]).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Authentication);
}

#[tokio::test]
async fn test_http_status_error() {
    let (_odoo, addr) = FakeOdoo::start().await;
    let config = OdooConfig {
        host: Some(format!("http://{addr}/broken/")),
        ..FakeOdoo::config(addr)
    };
    let client = OdooClient::new(config).unwrap();

    let error = client.delete("res.partner", &[1]).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::ExternalError);
    assert!(error.to_string().contains("500"));
}

#[tokio::test]
async fn test_invalid_query_never_reaches_the_server() {
    let (odoo, addr) = FakeOdoo::start().await;
    let client = OdooClient::new(FakeOdoo::config(addr)).unwrap();

    let error = client
        .query_by_name("name_search", "res.partner", Vec::new(), Value::empty_struct())
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidInput);
    assert_eq!(error.field(), Some("query_type"));

    let error = client
        .create("res partner", name("test"))
        .await
        .unwrap_err();
    assert_eq!(error.field(), Some("model"));

    assert!(odoo.calls().is_empty());
}
