//! PostgreSQL [`TestRequestStore`].
//!
//! Schema lives in `migrations/`. A transition is one transaction: a conditional
//! `UPDATE ... WHERE status = $expected`, the sub-record upserts and the flow
//! insert. Zero affected rows on the conditional update aborts the transaction.
//! The saved request is read back before commit, so a committed transition is
//! never reported as a failure.

use crate::models::{Consultation, LabResult, NewTestRequest, RequestFlow, TestRequest, User};
use crate::state_machine::errors::{PersistenceError, PersistenceResult};
use crate::state_machine::persistence::TestRequestStore;
use crate::state_machine::states::RequestStatus;
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};

const SELECT_REQUESTS: &str = r#"
    SELECT r.request_id, r.name, r.created, r.age, r.email, r.phone_number, r.pin_code,
           r.address, r.gender, r.status, r.created_by_id, r.created_by_user_name,
           l.tester_id, l.tester_user_name, l.blood_pressure, l.heart_beat, l.temperature,
           l.oxygen_level, l.comments AS lab_comments, l.result, l.updated_on AS lab_updated_on,
           c.doctor_id, c.doctor_user_name, c.suggestion,
           c.comments AS consultation_comments, c.updated_on AS consultation_updated_on
    FROM test_requests r
    LEFT JOIN lab_results l ON l.request_id = r.request_id
    LEFT JOIN consultations c ON c.request_id = r.request_id
"#;

#[derive(Debug, Clone)]
pub struct PgTestRequestStore {
    pool: PgPool,
}

impl PgTestRequestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_one(
        conn: &mut PgConnection,
        request_id: i64,
    ) -> PersistenceResult<Option<TestRequest>> {
        let sql = format!("{SELECT_REQUESTS} WHERE r.request_id = $1");
        let row = sqlx::query(&sql)
            .bind(request_id)
            .fetch_optional(&mut *conn)
            .await?;
        row.as_ref().map(map_request_row).transpose()
    }

    async fn current_status(
        conn: &mut PgConnection,
        request_id: i64,
    ) -> PersistenceResult<Option<RequestStatus>> {
        let status: Option<String> =
            sqlx::query_scalar("SELECT status FROM test_requests WHERE request_id = $1")
                .bind(request_id)
                .fetch_optional(&mut *conn)
                .await?;
        status.map(|s| parse_column("status", &s)).transpose()
    }

    async fn insert_flow(conn: &mut PgConnection, flow: &RequestFlow) -> PersistenceResult<()> {
        sqlx::query(
            r#"
            INSERT INTO test_request_flows
            (request_id, from_status, to_status, changed_by_id, changed_by_user_name, happened_on)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(flow.request_id)
        .bind(flow.from_status.map(|s| s.to_string()))
        .bind(flow.to_status.to_string())
        .bind(flow.changed_by.id)
        .bind(&flow.changed_by.user_name)
        .bind(flow.happened_on)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    async fn upsert_lab_result(
        conn: &mut PgConnection,
        request_id: i64,
        lab_result: &LabResult,
    ) -> PersistenceResult<()> {
        sqlx::query(
            r#"
            INSERT INTO lab_results
            (request_id, tester_id, tester_user_name, blood_pressure, heart_beat, temperature,
             oxygen_level, comments, result, updated_on)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (request_id) DO UPDATE SET
                tester_id = EXCLUDED.tester_id,
                tester_user_name = EXCLUDED.tester_user_name,
                blood_pressure = EXCLUDED.blood_pressure,
                heart_beat = EXCLUDED.heart_beat,
                temperature = EXCLUDED.temperature,
                oxygen_level = EXCLUDED.oxygen_level,
                comments = EXCLUDED.comments,
                result = EXCLUDED.result,
                updated_on = EXCLUDED.updated_on
            "#,
        )
        .bind(request_id)
        .bind(lab_result.tester.id)
        .bind(&lab_result.tester.user_name)
        .bind(&lab_result.blood_pressure)
        .bind(&lab_result.heart_beat)
        .bind(&lab_result.temperature)
        .bind(&lab_result.oxygen_level)
        .bind(&lab_result.comments)
        .bind(lab_result.result.map(|r| r.to_string()))
        .bind(lab_result.updated_on)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    async fn upsert_consultation(
        conn: &mut PgConnection,
        request_id: i64,
        consultation: &Consultation,
    ) -> PersistenceResult<()> {
        sqlx::query(
            r#"
            INSERT INTO consultations
            (request_id, doctor_id, doctor_user_name, suggestion, comments, updated_on)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (request_id) DO UPDATE SET
                doctor_id = EXCLUDED.doctor_id,
                doctor_user_name = EXCLUDED.doctor_user_name,
                suggestion = EXCLUDED.suggestion,
                comments = EXCLUDED.comments,
                updated_on = EXCLUDED.updated_on
            "#,
        )
        .bind(request_id)
        .bind(consultation.doctor.id)
        .bind(&consultation.doctor.user_name)
        .bind(consultation.suggestion.map(|s| s.to_string()))
        .bind(&consultation.comments)
        .bind(consultation.updated_on)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl TestRequestStore for PgTestRequestStore {
    async fn find_by_id(&self, request_id: i64) -> PersistenceResult<Option<TestRequest>> {
        let mut conn = self.pool.acquire().await?;
        Self::fetch_one(&mut conn, request_id).await
    }

    async fn insert(&self, request: NewTestRequest) -> PersistenceResult<TestRequest> {
        let age = to_i32("age", request.age)?;
        let pin_code = to_i32("pin_code", request.pin_code)?;

        let mut tx = self.pool.begin().await?;

        let request_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO test_requests
            (name, created, age, email, phone_number, pin_code, address, gender, status,
             created_by_id, created_by_user_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING request_id
            "#,
        )
        .bind(&request.name)
        .bind(request.created)
        .bind(age)
        .bind(&request.email)
        .bind(&request.phone_number)
        .bind(pin_code)
        .bind(&request.address)
        .bind(request.gender.to_string())
        .bind(RequestStatus::Initiated.to_string())
        .bind(request.created_by.id)
        .bind(&request.created_by.user_name)
        .fetch_one(&mut *tx)
        .await?;

        let created = request.into_request(request_id);
        let flow = RequestFlow::new(
            request_id,
            None,
            created.status,
            created.created_by.clone(),
        );
        Self::insert_flow(&mut tx, &flow).await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn save_transition(
        &self,
        request: &TestRequest,
        expected_status: RequestStatus,
        flow: RequestFlow,
    ) -> PersistenceResult<TestRequest> {
        let request_id = request.request_id;
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE test_requests SET status = $1 WHERE request_id = $2 AND status = $3",
        )
        .bind(request.status.to_string())
        .bind(request_id)
        .bind(expected_status.to_string())
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            let actual = Self::current_status(&mut tx, request_id).await?;
            tx.rollback().await?;
            return Err(match actual {
                Some(actual) => PersistenceError::ConcurrentModification {
                    request_id,
                    expected: expected_status,
                    actual,
                },
                None => PersistenceError::Missing { request_id },
            });
        }

        if let Some(lab_result) = &request.lab_result {
            Self::upsert_lab_result(&mut tx, request_id, lab_result).await?;
        }
        if let Some(consultation) = &request.consultation {
            Self::upsert_consultation(&mut tx, request_id, consultation).await?;
        }
        Self::insert_flow(&mut tx, &flow).await?;

        let saved = Self::fetch_one(&mut tx, request_id)
            .await?
            .ok_or(PersistenceError::Missing { request_id })?;
        tx.commit().await?;
        Ok(saved)
    }

    async fn find_by_status(&self, status: RequestStatus) -> PersistenceResult<Vec<TestRequest>> {
        let sql = select_where("r.status = $1");
        let rows = sqlx::query(&sql)
            .bind(status.to_string())
            .fetch_all(&self.pool)
            .await?;
        map_request_rows(&rows)
    }

    async fn find_by_tester(&self, tester_id: i64) -> PersistenceResult<Vec<TestRequest>> {
        let sql = select_where("l.tester_id = $1");
        let rows = sqlx::query(&sql)
            .bind(tester_id)
            .fetch_all(&self.pool)
            .await?;
        map_request_rows(&rows)
    }

    async fn find_by_doctor(&self, doctor_id: i64) -> PersistenceResult<Vec<TestRequest>> {
        let sql = select_where("c.doctor_id = $1");
        let rows = sqlx::query(&sql)
            .bind(doctor_id)
            .fetch_all(&self.pool)
            .await?;
        map_request_rows(&rows)
    }

    async fn find_by_created_by(&self, user_id: i64) -> PersistenceResult<Vec<TestRequest>> {
        let sql = select_where("r.created_by_id = $1");
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        map_request_rows(&rows)
    }

    async fn find_active_by_email_or_phone(
        &self,
        email: &str,
        phone_number: &str,
    ) -> PersistenceResult<Vec<TestRequest>> {
        let sql = select_where("(r.email = $1 OR r.phone_number = $2) AND r.status <> $3");
        let rows = sqlx::query(&sql)
            .bind(email)
            .bind(phone_number)
            .bind(RequestStatus::Completed.to_string())
            .fetch_all(&self.pool)
            .await?;
        map_request_rows(&rows)
    }

    async fn flow_history(&self, request_id: i64) -> PersistenceResult<Vec<RequestFlow>> {
        let rows = sqlx::query(
            r#"
            SELECT request_id, from_status, to_status, changed_by_id, changed_by_user_name,
                   happened_on
            FROM test_request_flows
            WHERE request_id = $1
            ORDER BY id
            "#,
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_flow_row).collect()
    }
}

fn select_where(clause: &str) -> String {
    format!("{SELECT_REQUESTS} WHERE {clause} ORDER BY r.request_id")
}

fn map_request_rows(rows: &[PgRow]) -> PersistenceResult<Vec<TestRequest>> {
    rows.iter().map(map_request_row).collect()
}

fn to_i32(field: &str, value: u32) -> PersistenceResult<i32> {
    i32::try_from(value).map_err(|_| PersistenceError::InvalidData {
        field: field.to_string(),
        reason: format!("{value} does not fit in INTEGER"),
    })
}

fn to_u32(field: &str, value: i32) -> PersistenceResult<u32> {
    u32::try_from(value).map_err(|_| PersistenceError::InvalidData {
        field: field.to_string(),
        reason: format!("negative value {value}"),
    })
}

fn parse_column<T>(field: &str, value: &str) -> PersistenceResult<T>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|reason| PersistenceError::InvalidData {
            field: field.to_string(),
            reason,
        })
}

fn parse_optional<T>(field: &str, value: Option<String>) -> PersistenceResult<Option<T>>
where
    T: std::str::FromStr<Err = String>,
{
    value.map(|v| parse_column(field, &v)).transpose()
}

fn map_request_row(row: &PgRow) -> PersistenceResult<TestRequest> {
    let lab_result = match row.try_get::<Option<i64>, _>("tester_id")? {
        Some(tester_id) => Some(LabResult {
            tester: User::new(tester_id, row.try_get::<String, _>("tester_user_name")?),
            blood_pressure: row.try_get("blood_pressure")?,
            heart_beat: row.try_get("heart_beat")?,
            temperature: row.try_get("temperature")?,
            oxygen_level: row.try_get("oxygen_level")?,
            comments: row.try_get("lab_comments")?,
            result: parse_optional("result", row.try_get("result")?)?,
            updated_on: row.try_get("lab_updated_on")?,
        }),
        None => None,
    };

    let consultation = match row.try_get::<Option<i64>, _>("doctor_id")? {
        Some(doctor_id) => Some(Consultation {
            doctor: User::new(doctor_id, row.try_get::<String, _>("doctor_user_name")?),
            suggestion: parse_optional("suggestion", row.try_get("suggestion")?)?,
            comments: row.try_get("consultation_comments")?,
            updated_on: row.try_get("consultation_updated_on")?,
        }),
        None => None,
    };

    Ok(TestRequest {
        request_id: row.try_get("request_id")?,
        name: row.try_get("name")?,
        created: row.try_get("created")?,
        age: to_u32("age", row.try_get("age")?)?,
        email: row.try_get("email")?,
        phone_number: row.try_get("phone_number")?,
        pin_code: to_u32("pin_code", row.try_get("pin_code")?)?,
        address: row.try_get("address")?,
        gender: parse_column("gender", &row.try_get::<String, _>("gender")?)?,
        status: parse_column("status", &row.try_get::<String, _>("status")?)?,
        created_by: User::new(
            row.try_get("created_by_id")?,
            row.try_get::<String, _>("created_by_user_name")?,
        ),
        lab_result,
        consultation,
    })
}

fn map_flow_row(row: &PgRow) -> PersistenceResult<RequestFlow> {
    Ok(RequestFlow {
        request_id: row.try_get("request_id")?,
        from_status: parse_optional("from_status", row.try_get("from_status")?)?,
        to_status: parse_column("to_status", &row.try_get::<String, _>("to_status")?)?,
        changed_by: User::new(
            row.try_get("changed_by_id")?,
            row.try_get::<String, _>("changed_by_user_name")?,
        ),
        happened_on: row.try_get("happened_on")?,
    })
}
