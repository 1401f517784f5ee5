use crate::api::availability::{
    SubmitAvailability, TargetWeekResponse, TeamMemberSchedule, TeamScheduleResponse,
};
use crate::api::booking::{CreateBooking, UpdateBooking};
use crate::api::employee::{CreateEmployee, EmployeeListResponse};
use crate::api::holiday::{CreateHoliday, ImportHolidays, UpdateHoliday};
use crate::api::leave_request::{CreateLeave, LeaveFilter, LeaveListResponse, LeaveResponse};
use crate::api::meeting_room::{CreateRoom, RoomResponse, UpdateRoom};
use crate::api::settings::UpdateSettings;
use crate::model::booking::Booking;
use crate::model::department::Department;
use crate::model::employee::Employee;
use crate::model::holiday::Holiday;
use crate::model::permission::PagePermission;
use crate::model::settings::AppSettings;
use crate::utils::slots::SlotAvailability;
use crate::utils::week::WeekdayGrid;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Desk API",
        version = "1.0.0",
        description = r#"
## HR Administration Backend

This API powers an internal HR administration dashboard.

### Key Features
- **Employee Directory**
  - Create, update, list, and view employee profiles
- **Department Management**
  - Departments with leads; deleting a department detaches its members
- **Leave Workflow**
  - Request leave, manager forwarding, RH approval with balance debit,
    rejection and cancellation
- **Meeting Rooms & Bookings**
  - 30-minute slots between 08:00 and 18:00, double-booking prevented
- **Weekly Availability**
  - Up to 3 in-office days per employee per week, team-wide grid
- **Holiday Calendar**
  - Managed individually or bulk-imported
- **Settings**
  - Singleton settings with defaults and a leave-accrual run

### Security
All endpoints outside `/auth` require **JWT Bearer authentication**; each
handler additionally checks the caller's role against the page permission
matrix.

### Response Format
- JSON-based RESTful responses
- Validation failures return a field-level `errors` map
"#,
    ),
    paths(
        crate::api::permission::my_permissions,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::department::create_department,
        crate::api::department::list_departments,
        crate::api::department::update_department,
        crate::api::department::assign_lead,
        crate::api::department::delete_department,

        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::hr_approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::cancel_leave,

        crate::api::holiday::create_holiday,
        crate::api::holiday::list_holidays,
        crate::api::holiday::update_holiday,
        crate::api::holiday::delete_holiday,
        crate::api::holiday::import_holidays,

        crate::api::meeting_room::create_room,
        crate::api::meeting_room::list_rooms,
        crate::api::meeting_room::update_room,
        crate::api::meeting_room::delete_room,

        crate::api::booking::list_slots,
        crate::api::booking::list_bookings,
        crate::api::booking::create_booking,
        crate::api::booking::update_booking,
        crate::api::booking::delete_booking,

        crate::api::availability::my_availability,
        crate::api::availability::submit_availability,
        crate::api::availability::team_schedule,

        crate::api::settings::get_settings,
        crate::api::settings::update_settings,
        crate::api::settings::run_accrual,
    ),
    components(
        schemas(
            PagePermission,
            Employee,
            CreateEmployee,
            EmployeeListResponse,
            Department,
            LeaveFilter,
            LeaveResponse,
            LeaveListResponse,
            CreateLeave,
            Holiday,
            CreateHoliday,
            UpdateHoliday,
            ImportHolidays,
            CreateRoom,
            UpdateRoom,
            RoomResponse,
            Booking,
            CreateBooking,
            UpdateBooking,
            SlotAvailability,
            SubmitAvailability,
            TargetWeekResponse,
            TeamMemberSchedule,
            TeamScheduleResponse,
            WeekdayGrid,
            AppSettings,
            UpdateSettings,
        )
    ),
    tags(
        (name = "Permissions", description = "Role/page permission map"),
        (name = "Employee", description = "Employee directory APIs"),
        (name = "Department", description = "Department management APIs"),
        (name = "Leave", description = "Leave workflow APIs"),
        (name = "Holiday", description = "Holiday calendar APIs"),
        (name = "Room", description = "Meeting room APIs"),
        (name = "Booking", description = "Room booking APIs"),
        (name = "Availability", description = "Weekly availability APIs"),
        (name = "Settings", description = "Application settings APIs"),
    )
)]
pub struct ApiDoc;
