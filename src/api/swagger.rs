use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bootcamp Service API",
        version = "1.0.0",
        description = "Mentor groups, shared bucket lists and the points ledger.\n\n**Task mutations** take the acting user's email in the `user_email` query parameter; only Mentor and Admin accounts may add, complete, toggle or delete tasks.\n\n**Points:** completing a task awards 10 points to the mentor and every member of the group; un-completing it takes them back. Deleting a task never changes points.",
        contact(
            name = "Bootcamp Service Team"
        )
    ),
    paths(
        // Auth
        crate::api::auth::signup,
        crate::api::auth::login,

        // Profiles & groups
        crate::api::profile::get_profile,
        crate::api::profile::update_profile,
        crate::api::profile::update_profile_picture,
        crate::api::profile::get_by_role,
        crate::api::profile::get_group_members,
        crate::api::profile::get_leaderboard,

        // Bucket lists
        crate::api::bucket_list::get_bucket_list,
        crate::api::bucket_list::list_tasks,
        crate::api::bucket_list::get_all_bucket_lists,
        crate::api::bucket_list::add_task,
        crate::api::bucket_list::complete_task,
        crate::api::bucket_list::toggle_task,
        crate::api::bucket_list::delete_task,

        // Images
        crate::api::images::upload_image,
        crate::api::images::get_image,
        crate::api::images::list_user_images,
        crate::api::images::delete_image,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
        crate::api::metrics::get_storage_metrics,
    ),
    components(
        schemas(
            crate::models::SignupRequest,
            crate::models::LoginRequest,
            crate::models::AuthResponse,
            crate::models::UserProfile,
            crate::models::UpdateProfileRequest,
            crate::models::ProfilePictureRequest,
            crate::models::Task,
            crate::models::BucketList,
            crate::models::AddTaskRequest,
            crate::models::ToggleTaskRequest,
            crate::models::TaskCreatedResponse,
            crate::api::bucket_list::TaskUpdateResponse,
            crate::models::UploadImageRequest,
            crate::models::ImageSummary,
            crate::models::StorageMetrics,
            crate::models::CollectionUsage,
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Signup and login with email and password."),
        (name = "Profile", description = "Profiles, role listings, mentor groups and the leaderboard."),
        (name = "Bucket Lists", description = "Shared task lists of mentor groups. Completion changes drive the points ledger."),
        (name = "Images", description = "Image blob store used for profile pictures and uploads."),
        (name = "Health", description = "Health check, Prometheus counters and storage usage."),
    )
)]
pub struct ApiDoc;
