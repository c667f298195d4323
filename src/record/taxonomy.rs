//! The fixed classification taxonomy offered to the model.
//!
//! Values are emitted verbatim into the prompt. The parser does not check replies against
//! these tables.

/// A taxonomy value and the description shown to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub description: &'static str,
}

const fn cat(name: &'static str, description: &'static str) -> Category {
    Category { name, description }
}

pub const SYSTEM_COMPONENTS: &[Category] = &[
    cat("Gantry", "issues with the scanner gantry"),
    cat("Couch", "issues with the patient couch/table and its accessories"),
    cat(
        "Software",
        "scan control, user operation, image viewing and processing software",
    ),
    cat(
        "CIRS",
        "image reconstruction, reconstruction performance, or anything mentioning CIRS/Recon",
    ),
    cat("Image Quality", "image quality issues"),
    cat("IC", "X-ray tube and high-voltage generation"),
    cat("DMS", "detector and detector module replacement"),
    cat(
        "PC Hardware",
        "computer hardware such as mouse, keyboard, monitor, hard disk",
    ),
    cat("Enhancement", "feature enhancement request"),
    cat("Not a complaint", "not a complaint"),
];

pub const FAILURE_MODES: &[Category] = &[
    cat("FM1-System Down", "system completely unable to work"),
    cat("FM2-Fail to scan", "unable to scan"),
    cat("FM3-Fail to generate images", "unable to generate images"),
    cat("FM4-Image Quality", "image quality problem"),
    cat("FM5-Fail to initialize/operation", "initialization or operation failure"),
    cat(
        "FM6-Fail to provide correct information",
        "incorrect information provided",
    ),
    cat("FM7-DICOM/Interoperability", "DICOM or interoperability problem"),
    cat("FM8-Usability", "usability problem"),
    cat("Not a failure", "not a failure"),
];

pub const SEVERITIES: &[Category] = &[
    cat("Safety", "safety related"),
    cat("High", "high severity"),
    cat("Med", "medium severity"),
    cat("Low", "low severity"),
    cat("Enhancement", "feature enhancement"),
];

pub const PRIORITIES: &[Category] = &[
    cat("High", "high priority"),
    cat("Med", "medium priority"),
    cat("Low", "low priority"),
];

/// Level-2 categories, grouped by the system component they refine.
pub const LEVEL2: &[(&str, &[Category])] = &[
    (
        "Gantry",
        &[
            cat("Power Supply", "power supply / PDU faults"),
            cat("Communication", "gantry communication faults"),
            cat("Slipring", "slip ring faults"),
            cat("Cover", "covers and mylar ring"),
            cat("Panel", "control panel"),
            cat("Intercom", "operator to patient intercom"),
            cat("CT Box", "CT control box"),
            cat("Noise", "noise"),
            cat("Firmware", "firmware"),
            cat("Software", "software"),
            cat("Other", "other"),
        ],
    ),
    (
        "Couch",
        &[
            cat(
                "Accessory",
                "head holder, extension board, mattress, straps, foot switch",
            ),
            cat("Motion Control", "couch motion control"),
            cat("Noise", "noise"),
            cat("Cable", "cables such as PIM or encoder cables"),
            cat("Servo", "servo"),
            cat("PCBA", "PCBA"),
            cat("User Experience", "user experience"),
            cat("Other", "other"),
        ],
    ),
    (
        "CIRS",
        &[
            cat("Timesync", "CIRS server time sync"),
            cat("Slowness", "slow reconstruction"),
            cat("IQ", "image quality"),
            cat("No Image", "no images reconstructed or images lost"),
            cat("Stuck", "hang"),
            cat("Other", "other"),
        ],
    ),
    (
        "Software",
        &[
            cat(
                "Configuration",
                "system settings such as protocol, DICOM and time configuration",
            ),
            cat(
                "DICOM/Connectivity",
                "DICOM/PACS/RIS/HIS transfer, worklist and MPPS",
            ),
            cat("ExamCard", "scan protocol / ExamCard"),
            cat("Usability", "usability"),
            cat("Security", "information security"),
            cat("Bolus Tracking", "bolus tracking and contrast triggering"),
            cat("Film/Report", "film printing or reports"),
            cat("IVC", "IVC software"),
            cat("BSOD/Crash", "blue screen and crashes"),
            cat("Stuck/Slowness", "system hang or slowness"),
            cat("Restart", "restarts"),
            cat("Dose", "radiation dose"),
            cat(
                "Application",
                "image processing applications such as MPR, VR, 3D, CTA",
            ),
            cat("Tools", "service tools"),
            cat("Other", "other"),
        ],
    ),
    (
        "Image Quality",
        &[
            cat("Calibration", "calibration, recoverable by recalibrating"),
            cat("Dose", "radiation dose"),
            cat("Preview IQ", "preview image quality"),
            cat("Poor IQ", "general image quality complaint"),
            cat("Artifact", "image artifacts"),
            cat("DMS Module", "DMS module"),
            cat("Other", "other"),
        ],
    ),
    (
        "DMS",
        &[
            cat("Module", "module replacement"),
            cat("Firmware", "firmware"),
            cat("Noise", "noise"),
            cat("Calibration", "calibration"),
            cat("Power", "power"),
            cat("Other", "other"),
        ],
    ),
    (
        "IC",
        &[
            cat("Tube", "X-ray tube faults"),
            cat("Generator", "high-voltage generator faults"),
            cat("PB", "power block faults"),
            cat("CLU/Heat Exchanger", "heat exchanger faults"),
            cat("Other", "other"),
        ],
    ),
];

/// Returns the level-2 categories for a system component, if it has any.
pub fn level2_for(system_component: &str) -> Option<&'static [Category]> {
    LEVEL2
        .iter()
        .find(|(component, _)| *component == system_component)
        .map(|(_, categories)| *categories)
}
