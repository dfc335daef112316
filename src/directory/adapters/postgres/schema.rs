//! Diesel schema for directory persistence.

diesel::table! {
    /// Support agents.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Unique email address.
        #[max_length = 255]
        email -> Varchar,
        /// Opaque credential hash.
        pass_hash -> Bytea,
        /// Role name.
        #[max_length = 20]
        role -> Varchar,
        /// Status name.
        #[max_length = 20]
        status -> Varchar,
        /// Running average duration in seconds.
        average_duration -> Float8,
        /// Optional telegram username.
        #[max_length = 64]
        telegram_handle -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Append-only record of running-average changes.
    user_load_ledger (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Monotonic insertion order.
        sequence -> Int8,
        /// Owning user.
        user_id -> Uuid,
        /// Task that caused the change, if any.
        task_id -> Nullable<Uuid>,
        /// `reset` or `adjust`.
        #[max_length = 10]
        change_kind -> Varchar,
        /// Absolute value or signed delta.
        amount -> Float8,
        /// Recording timestamp.
        recorded_at -> Timestamptz,
    }
}
