use utoipa::OpenApi;

use rollcall_core::PaginationMeta;
use rollcall_models::{
    AssignClassDto, Class, ClassAnalytics, ClassAnalyticsDetails, ClassSummary,
    ClassWithRelations, CreateClassDto, CreateStudentDto, CreateTeacherDto, ErrorResponse,
    FinancialSummary, Gender, GenderDistribution, MessageResponse, PaginatedClassesResponse,
    PaginatedStudentsResponse, PaginatedTeachersResponse, PeriodType, Student,
    StudentGenderSummary, StudentSummary, StudentWithClass, Teacher, TeacherSummary,
    UpdateClassDto, UpdateStudentDto, UpdateTeacherDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::router::health_check,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::get_classes,
        crate::modules::classes::controller::get_class,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::delete_class,
        crate::modules::classes::controller::assign_student,
        crate::modules::classes::controller::unassign_student,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::students::controller::assign_class,
        crate::modules::students::controller::unassign_class,
        crate::modules::analytics::controller::get_class_analytics,
        crate::modules::analytics::controller::get_financials,
    ),
    components(
        schemas(
            Gender,
            Class,
            ClassSummary,
            ClassWithRelations,
            CreateClassDto,
            UpdateClassDto,
            PaginatedClassesResponse,
            Teacher,
            TeacherSummary,
            CreateTeacherDto,
            UpdateTeacherDto,
            PaginatedTeachersResponse,
            Student,
            StudentSummary,
            StudentWithClass,
            CreateStudentDto,
            UpdateStudentDto,
            AssignClassDto,
            PaginatedStudentsResponse,
            ClassAnalytics,
            ClassAnalyticsDetails,
            StudentGenderSummary,
            GenderDistribution,
            PeriodType,
            FinancialSummary,
            PaginationMeta,
            MessageResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Classes", description = "Classes and their student rosters"),
        (name = "Teachers", description = "Teacher records"),
        (name = "Students", description = "Student records and class assignment"),
        (name = "Analytics", description = "Gender distribution and financial reports"),
    ),
    info(
        title = "Rollcall API",
        version = "0.1.0",
        description = "School administration API for classes, teachers and students, built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;
