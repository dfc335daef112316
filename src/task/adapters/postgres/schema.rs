//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Support tasks.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Monotonic insertion order used for listings.
        sequence -> Int8,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Free-form description.
        description -> Text,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Start-of-work timestamp.
        formed_at -> Nullable<Timestamptz>,
        /// Closure timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Attached case.
        case_id -> Nullable<Uuid>,
        /// Owning cluster.
        cluster_id -> Uuid,
        /// Assignee.
        user_id -> Nullable<Uuid>,
        /// Solution text.
        solution -> Nullable<Text>,
        /// Average-duration snapshot in seconds.
        average_duration -> Float8,
        /// Escalation flag.
        fired -> Bool,
    }
}
