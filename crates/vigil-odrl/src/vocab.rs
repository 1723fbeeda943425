// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! ODRL 2.2 vocabulary identifiers.

pub const ODRL_NS: &str = "http://www.w3.org/ns/odrl/2/";

pub const REQUEST: &str = "http://www.w3.org/ns/odrl/2/Request";
pub const OFFER: &str = "http://www.w3.org/ns/odrl/2/Offer";

pub const PERMISSION: &str = "http://www.w3.org/ns/odrl/2/permission";
pub const PROHIBITION: &str = "http://www.w3.org/ns/odrl/2/prohibition";
pub const ASSIGNEE: &str = "http://www.w3.org/ns/odrl/2/assignee";
pub const ACTION: &str = "http://www.w3.org/ns/odrl/2/action";
pub const TARGET: &str = "http://www.w3.org/ns/odrl/2/target";
pub const CONSTRAINT: &str = "http://www.w3.org/ns/odrl/2/constraint";
pub const LEFT_OPERAND: &str = "http://www.w3.org/ns/odrl/2/leftOperand";
pub const OPERATOR: &str = "http://www.w3.org/ns/odrl/2/operator";
pub const RIGHT_OPERAND: &str = "http://www.w3.org/ns/odrl/2/rightOperand";
pub const UID: &str = "http://www.w3.org/ns/odrl/2/uid";
