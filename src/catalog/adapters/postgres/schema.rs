//! Diesel schema for catalog persistence.

diesel::table! {
    /// Ticket clusters keyed by a unique external index.
    clusters (id) {
        /// Internal cluster identifier.
        id -> Uuid,
        /// Unique external index.
        cluster_index -> Int8,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Observed frequency count.
        frequency -> Int8,
    }
}

diesel::table! {
    /// Knowledge-base cases.
    cases (id) {
        /// Case identifier.
        id -> Uuid,
        /// Optional owning cluster.
        cluster_id -> Nullable<Uuid>,
        /// Case title.
        #[max_length = 255]
        title -> Varchar,
        /// Solution text.
        solution -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
