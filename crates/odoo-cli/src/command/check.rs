//! End-to-end connection check.
//!
//! Exercises every query type against `res.partner`: looks up partner 1,
//! creates a partner named `test`, renames it to `abc`, deletes it and makes
//! sure it is gone. Partner 1 is only read.

use anyhow::{Context, ensure};
use odoo_api::{
    Domain, OdooClient, Operator, ReadOptions, SearchOptions, SearchReadOptions, Value, Values,
};

use crate::TRACING_TARGET_COMMAND;

const MODEL: &str = "res.partner";
const FIRST_PARTNER: i64 = 1;

fn name(value: &str) -> Values {
    Values::from([("name".to_owned(), Value::from(value))])
}

fn by_id(id: i64) -> Domain {
    Domain::new().with("id", Operator::Eq, id)
}

fn step(description: &str) {
    tracing::info!(target: TRACING_TARGET_COMMAND, "{description}");
}

/// Runs the check, failing on the first step that does not behave.
pub(super) async fn run(client: &OdooClient) -> anyhow::Result<()> {
    step("Searching for the first partner by id");
    let ids = client
        .search(MODEL, &by_id(FIRST_PARTNER), SearchOptions::default())
        .await
        .context("search for partner 1 failed")?;
    ensure!(
        ids == [FIRST_PARTNER],
        "search for partner id 1 did not return id 1, got {ids:?}"
    );

    step("Reading the first partner");
    let fields = ReadOptions::default().with_fields(["name"]);
    let read = client
        .read(MODEL, &ids, fields.clone())
        .await
        .context("read of partner 1 failed")?;
    ensure!(
        read.len() == 1 && read[0].id() == Some(FIRST_PARTNER) && read[0].get("name").is_some(),
        "read of partner 1 did not return its id and name"
    );

    step("Searching for and reading the first partner");
    let search_read = client
        .search_and_read(MODEL, &by_id(FIRST_PARTNER), SearchReadOptions::from(fields.clone()))
        .await
        .context("search_read of partner 1 failed")?;
    ensure!(
        search_read == read,
        "search_read of partner 1 did not match read"
    );

    step("Creating a partner");
    let id = client
        .create(MODEL, name("test"))
        .await
        .context("create of a partner failed")?;

    step("Updating the created partner");
    let updated = client
        .update(MODEL, &[id], name("abc"))
        .await
        .with_context(|| format!("update of partner {id} failed"))?;
    ensure!(updated, "update of partner {id} returned false");

    step("- Ensuring it was changed");
    let changed = client
        .read(MODEL, &[id], fields)
        .await
        .with_context(|| format!("read of partner {id} failed"))?;
    ensure!(
        changed.first().and_then(|partner| partner.get("name")) == Some(&Value::from("abc")),
        "partner {id} was not renamed to 'abc'"
    );

    step("Deleting the created partner");
    let deleted = client
        .delete(MODEL, &[id])
        .await
        .with_context(|| format!("delete of partner {id} failed"))?;
    ensure!(deleted, "delete of partner {id} returned false");

    step("- Ensuring it was deleted");
    let remaining = client
        .search(MODEL, &by_id(id), SearchOptions::default())
        .await
        .with_context(|| format!("search for partner {id} failed"))?;
    ensure!(remaining.is_empty(), "partner {id} still exists after delete");

    tracing::info!(
        target: TRACING_TARGET_COMMAND,
        "All checks have successfully passed"
    );
    Ok(())
}
