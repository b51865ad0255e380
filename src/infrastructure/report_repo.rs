use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::sql_types::{Date, Integer, Json, Text};
use uuid::Uuid;

use crate::domain::errors::DbFault;
use crate::domain::report::{normalize_row, ReportParam, ReportRow};

#[derive(QueryableByName)]
struct CursorRow {
    #[diesel(sql_type = Json)]
    fila: serde_json::Value,
}

/// Build `CALL <procedure>($1::t1, …, $n::refcursor)`; the cursor is always last.
fn call_statement(procedure: &str, params: &[ReportParam]) -> String {
    let mut args: Vec<String> = params
        .iter()
        .enumerate()
        .map(|(i, p)| format!("${}::{}", i + 1, p.sql_type()))
        .collect();
    args.push(format!("${}::refcursor", params.len() + 1));
    format!("CALL {}({})", procedure, args.join(", "))
}

/// Invoke a reporting procedure and drain its output cursor.
///
/// The cursor only lives until the end of the enclosing transaction, so the
/// call and the fetch share one.
pub fn call_report(
    conn: &mut PgConnection,
    procedure: &str,
    params: &[ReportParam],
) -> Result<Vec<ReportRow>, DbFault> {
    let cursor = format!("rc_{}", Uuid::new_v4().simple());
    let statement = call_statement(procedure, params);

    conn.transaction::<_, DbFault, _>(|conn| {
        let mut call = diesel::sql_query(statement).into_boxed::<Pg>();
        for param in params {
            call = match param {
                ReportParam::Integer(v) => call.bind::<Integer, _>(*v),
                ReportParam::Date(d) => call.bind::<Date, _>(*d),
            };
        }
        call.bind::<Text, _>(cursor.clone()).execute(conn)?;

        let rows = diesel::sql_query("SELECT pkg_cursor.fetch_json($1::refcursor) AS fila")
            .bind::<Text, _>(&cursor)
            .load::<CursorRow>(conn)?;

        Ok(rows.into_iter().map(|r| normalize_row(r.fila)).collect())
    })
}
