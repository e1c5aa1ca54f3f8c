//! Built-in sample bills for demo mode.
//!
//! `POST /api/compare` with `demo=true` and no uploads analyzes these two
//! versions of a small education bill, so the full pipeline can be exercised
//! without preparing documents.

pub const DEMO_BILL_A_NAME: &str = "Education Equity and Access Act";
pub const DEMO_BILL_B_NAME: &str = "Enhanced Education Equity and Access Act";

pub const DEMO_BILL_A_TEXT: &str = "\
SECTION 1. SHORT TITLE.
This Act may be cited as the 'Education Equity and Access Act'.
SECTION 2. FUNDING.
Establishes a $1.5 billion annual fund for Title I schools for 5 years.
SECTION 3. DIGITAL ACCESS.
Provides technology access for students in grades 6-12.
SECTION 4. TEACHER SUPPORT.
Creates professional development programs.
";

pub const DEMO_BILL_B_TEXT: &str = "\
SECTION 1. SHORT TITLE.
This Act may be cited as the 'Enhanced Education Equity and Access Act'.
SECTION 2. FUNDING.
Establishes a $2 billion annual fund for Title I and rural schools for 6 years.
SECTION 3. DIGITAL ACCESS.
Provides technology access for students in grades 3-12.
SECTION 4. TEACHER SUPPORT.
Creates professional development programs with enhanced accountability measures.
";
