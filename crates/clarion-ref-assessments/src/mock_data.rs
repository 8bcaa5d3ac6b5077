//! Sample assessment sessions for the Clarion reference runtime.
//!
//! All data in this module is hardcoded and fictional. It stands in for the
//! session store a real deployment would query, and covers the shapes the
//! bundled configs expect:
//!
//! - `session_001`: complete Health & Fitness record
//! - `session_002`: complete Cardiac record with a filtered exercise lookup
//! - `session_003`: Health & Fitness record with most measurements missing
//! - `session_004`: record for an assessment with no registered config

use serde_json::{json, Value};

/// All sample sessions as a JSON array, in the order they were recorded.
pub fn sample_sessions() -> Value {
    json!([
        health_and_fitness_session(),
        cardiac_session(),
        partial_session(),
        unconfigured_session()
    ])
}

// ── Health & Fitness (as_hr_02) ───────────────────────────────────────────────

pub fn health_and_fitness_session() -> Value {
    json!({
        "session_id": "session_001",
        "assessment_id": "as_hr_02",
        "timestamp": 1736942400000_i64,
        "accuracy": 80,
        "timeElapsed": 332,
        "gender": "female",
        "height": 165,
        "weight": 61,
        "vitalsMap": {
            "vitals": {
                "heart_rate": 72,
                "bp_sys": 118,
                "bp_dia": 76,
                "oxy_sat_prcnt": 98
            },
            "health_risk_score": 15,
            "wellness_score": 82
        },
        "bodyCompositionData": {
            "BMI": 22.41,
            "BFC": 24.73
        },
        "exercises": [
            {
                "id": 91,
                "name": "Squats",
                "setList": [{ "reps": 15, "time": 40 }]
            },
            {
                "id": 235,
                "name": "Step Test",
                "setList": [{ "time": 180 }]
            }
        ]
    })
}

// ── Cardiac (as_card_01) ──────────────────────────────────────────────────────

pub fn cardiac_session() -> Value {
    json!({
        "session_id": "session_002",
        "assessment_id": "as_card_01",
        "timestamp": 1737028800000_i64,
        "accuracy": 17,
        "timeElapsed": 410,
        "gender": "male",
        "height": 178,
        "weight": 84,
        "vitalsMap": {
            "vitals": {
                "heart_rate": 88,
                "bp_sys": 134,
                "bp_dia": 86,
                "oxy_sat_prcnt": 96
            },
            "health_risk_score": 34,
            "wellness_score": 61
        },
        "exercises": [
            {
                "id": 73,
                "name": "Jumping Jacks",
                "setList": [{ "reps": 30, "time": 60 }]
            },
            {
                "id": 235,
                "name": "Cardio Endurance Run",
                "setList": [{ "time": 62 }, { "time": 58 }]
            }
        ]
    })
}

// ── Partial record ────────────────────────────────────────────────────────────

/// A Health & Fitness session interrupted after the first measurements.
pub fn partial_session() -> Value {
    json!({
        "session_id": "session_003",
        "assessment_id": "as_hr_02",
        "timestamp": "2025-01-17T09:30:00Z",
        "accuracy": 45,
        "vitalsMap": {
            "vitals": {
                "heart_rate": 105
            }
        }
    })
}

// ── Unregistered assessment ───────────────────────────────────────────────────

pub fn unconfigured_session() -> Value {
    json!({
        "session_id": "session_004",
        "assessment_id": "as_posture_03",
        "timestamp": 1737201600000_i64,
        "accuracy": 64
    })
}
