pub mod leave_record;
