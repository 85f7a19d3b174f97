//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly.

diesel::table! {
    /// Registered users keyed by lower-cased email.
    users (email) {
        email -> Varchar,
        password_hash -> Text,
        display_name -> Nullable<Varchar>,
        phone -> Nullable<Varchar>,
        /// Set together with `latitude`, or not at all.
        longitude -> Nullable<Float8>,
        latitude -> Nullable<Float8>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    medicines (id) {
        id -> Uuid,
        owner_email -> Varchar,
        name -> Varchar,
        category -> Varchar,
        quantity -> Int4,
        location -> Varchar,
        expires_at -> Timestamptz,
        image_ref -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Snapshots of shared medicines; unique per (medicine_id, contributor_email).
    community_entries (id) {
        id -> Uuid,
        medicine_id -> Uuid,
        contributor_email -> Varchar,
        name -> Varchar,
        category -> Varchar,
        quantity -> Int4,
        location -> Varchar,
        expires_at -> Timestamptz,
        image_ref -> Nullable<Text>,
        shared_by -> Text,
        contact_info -> Text,
        shared_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, medicines, community_entries);
