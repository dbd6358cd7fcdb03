use proptest::prelude::*;
use rusqlite::Connection;

use agenr_storage::migrations::run_migrations;
use agenr_storage::queries::watermark::{get_watermark, set_watermark};

fn fresh_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    conn
}

proptest! {
    #[test]
    fn watermark_never_decreases(values in proptest::collection::vec(0i64..10_000, 1..30)) {
        let conn = fresh_conn();
        let mut observed = 0i64;
        for v in values {
            set_watermark(&conn, "consumer", v).unwrap();
            let current = get_watermark(&conn, "consumer").unwrap().unwrap().max_seq;
            prop_assert!(current >= observed);
            observed = current;
        }
    }
}
