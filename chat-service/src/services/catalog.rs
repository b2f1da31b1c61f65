//! Built-in curated answers for the DTE EMIS help portal.

use crate::models::Role;

/// Questions every audience may ask about the portal itself.
const PORTAL: &[(&str, &str)] = &[
    (
        "what is dte emis",
        "DTE EMIS is the Directorate of Technical Education's Education Management Information System. Visit the official portal at https://emis.dtemaharashtra.gov.in/.",
    ),
    (
        "how do i log in to dte emis",
        "Go to https://emis.dtemaharashtra.gov.in/ and use your assigned credentials to log in.",
    ),
    (
        "where can i find the user manual",
        "The user manual is available on the DTE EMIS portal under the 'Help' or 'Documentation' section.",
    ),
    (
        "who can i contact for support",
        "For support, contact the DTE EMIS helpdesk at emis.support@dtemaharashtra.gov.in.",
    ),
    (
        "what is the official website for dte emis",
        "The official website is https://emis.dtemaharashtra.gov.in/.",
    ),
];

const STUDENT: &[(&str, &str)] = &[
    (
        "how do i check exam timetable",
        "Log in with your student credentials and open Examinations > Timetable to see the current exam schedule.",
    ),
    (
        "how do i apply for admission",
        "Admission notices and the online application form are published under the Admissions section of the portal.",
    ),
    (
        "where is the student login",
        "Use the Student Login button on the portal home page and sign in with the enrollment number issued by your institute.",
    ),
    (
        "how do i register for a course",
        "After logging in, open Academics > Course Registration and select the courses offered for the current term.",
    ),
    (
        "how do i access the library",
        "The digital library is available under Student Services > Library once you are logged in.",
    ),
];

const TEACHER: &[(&str, &str)] = &[
    (
        "where is the staff login",
        "Faculty members sign in through the Staff Login button on the portal home page using their institute-issued credentials.",
    ),
    (
        "where can i find the latest circular",
        "Circulars are listed under Faculty > Circulars, newest first.",
    ),
    (
        "how do i post an announcement",
        "Open Faculty > Announcements, choose the target classes and publish your announcement.",
    ),
    (
        "how do i register for an fdp",
        "Faculty Development Programmes are listed under Faculty > FDP, where you can register for upcoming sessions.",
    ),
];

const PARENT: &[(&str, &str)] = &[
    (
        "how can i track student performance",
        "Log in with the parent credentials linked to your ward and open Track Student > Performance.",
    ),
    (
        "how can i view hostel fee details",
        "Hostel fee details for your ward are shown under Parent > Hostel after you log in.",
    ),
    (
        "how do i apply for hostel",
        "Hostel applications are accepted through the Hostel section of the portal during the admission period.",
    ),
];

/// Built-in entries per role, as (question, answer) pairs.
pub fn builtin_entries() -> Vec<(Role, &'static [(&'static str, &'static str)])> {
    vec![
        (Role::Default, PORTAL),
        (Role::General, PORTAL),
        (Role::Student, STUDENT),
        (Role::Teacher, TEACHER),
        (Role::Parent, PARENT),
    ]
}
