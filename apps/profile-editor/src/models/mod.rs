pub mod profile;
pub mod wire;

pub use profile::{
    DoctorId, DoctorRecord, Experience, Gender, Qualification, Specialization, TimeSlot, Weekday,
};
