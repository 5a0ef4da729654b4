//! Well-known AAF identifiers: property ids, class ids, definition ids.

use super::Auid;

const fn smpte(d1: u32, d2: u16, d3: u16, b4: u8, b5: u8, b6: u8, b7: u8) -> Auid {
    Auid::new(d1, d2, d3, [0x06, 0x0e, 0x2b, 0x34, b4, b5, b6, b7])
}

// ============================================================================
// Property ids
// ============================================================================

/// Property ids (PIDs) of the built-in object model.
pub mod pid {
    pub const ROOT_META_DICTIONARY: u16 = 0x0001;
    pub const ROOT_HEADER: u16 = 0x0002;

    pub const META_DICTIONARY_CLASS_DEFINITIONS: u16 = 0x0003;
    pub const META_DICTIONARY_TYPE_DEFINITIONS: u16 = 0x0004;
    pub const META_DEFINITION_IDENTIFICATION: u16 = 0x0005;
    pub const META_DEFINITION_NAME: u16 = 0x0006;
    pub const META_DEFINITION_DESCRIPTION: u16 = 0x0007;
    pub const CLASS_DEFINITION_PARENT_CLASS: u16 = 0x0008;
    pub const CLASS_DEFINITION_PROPERTIES: u16 = 0x0009;
    pub const CLASS_DEFINITION_IS_CONCRETE: u16 = 0x000A;
    pub const PROPERTY_DEFINITION_TYPE: u16 = 0x000B;
    pub const PROPERTY_DEFINITION_IS_OPTIONAL: u16 = 0x000C;
    pub const PROPERTY_DEFINITION_LOCAL_IDENTIFICATION: u16 = 0x000D;
    pub const PROPERTY_DEFINITION_IS_UNIQUE_IDENTIFIER: u16 = 0x000E;

    pub const INTERCHANGE_OBJECT_OBJ_CLASS: u16 = 0x0101;
    pub const INTERCHANGE_OBJECT_GENERATION: u16 = 0x0102;

    pub const COMPONENT_DATA_DEFINITION: u16 = 0x0201;
    pub const COMPONENT_LENGTH: u16 = 0x0202;
    pub const COMPONENT_KLV_DATA: u16 = 0x0203;
    pub const COMPONENT_USER_COMMENTS: u16 = 0x0204;
    pub const COMPONENT_ATTRIBUTES: u16 = 0x0205;

    pub const ESSENCE_GROUP_CHOICES: u16 = 0x0501;
    pub const ESSENCE_GROUP_STILL_FRAME: u16 = 0x0502;
    pub const EVENT_POSITION: u16 = 0x0601;
    pub const EVENT_COMMENT: u16 = 0x0602;
    pub const COMMENT_MARKER_ANNOTATION: u16 = 0x0901;

    pub const OPERATION_GROUP_OPERATION: u16 = 0x0B01;
    pub const OPERATION_GROUP_INPUT_SEGMENTS: u16 = 0x0B02;
    pub const OPERATION_GROUP_PARAMETERS: u16 = 0x0B03;
    pub const OPERATION_GROUP_BYPASS_OVERRIDE: u16 = 0x0B04;
    pub const OPERATION_GROUP_RENDERING: u16 = 0x0B05;

    pub const NESTED_SCOPE_SLOTS: u16 = 0x0C01;
    pub const SELECTOR_SELECTED: u16 = 0x0F01;
    pub const SELECTOR_ALTERNATES: u16 = 0x0F02;
    pub const SEQUENCE_COMPONENTS: u16 = 0x1001;

    pub const SOURCE_REFERENCE_SOURCE_ID: u16 = 0x1101;
    pub const SOURCE_REFERENCE_SOURCE_MOB_SLOT_ID: u16 = 0x1102;
    pub const SOURCE_REFERENCE_CHANNEL_IDS: u16 = 0x1103;
    pub const SOURCE_REFERENCE_MONO_SOURCE_SLOT_IDS: u16 = 0x1104;
    pub const SOURCE_CLIP_START_TIME: u16 = 0x1201;
    pub const SOURCE_CLIP_FADE_IN_LENGTH: u16 = 0x1202;
    pub const SOURCE_CLIP_FADE_IN_TYPE: u16 = 0x1203;
    pub const SOURCE_CLIP_FADE_OUT_LENGTH: u16 = 0x1204;
    pub const SOURCE_CLIP_FADE_OUT_TYPE: u16 = 0x1205;

    pub const TIMECODE_START: u16 = 0x1501;
    pub const TIMECODE_FPS: u16 = 0x1502;
    pub const TIMECODE_DROP: u16 = 0x1503;

    pub const TRANSITION_OPERATION_GROUP: u16 = 0x1801;
    pub const TRANSITION_CUT_POINT: u16 = 0x1802;

    pub const CONTENT_STORAGE_MOBS: u16 = 0x1901;
    pub const CONTENT_STORAGE_ESSENCE_DATA: u16 = 0x1902;

    pub const CONTROL_POINT_VALUE: u16 = 0x1A02;
    pub const CONTROL_POINT_TIME: u16 = 0x1A03;
    pub const CONTROL_POINT_EDIT_HINT: u16 = 0x1A04;

    pub const DEFINITION_OBJECT_IDENTIFICATION: u16 = 0x1B01;
    pub const DEFINITION_OBJECT_NAME: u16 = 0x1B02;
    pub const DEFINITION_OBJECT_DESCRIPTION: u16 = 0x1B03;

    pub const OPERATION_DEFINITION_DATA_DEFINITION: u16 = 0x1E01;
    pub const OPERATION_DEFINITION_IS_TIME_WARP: u16 = 0x1E02;
    pub const OPERATION_DEFINITION_NUMBER_INPUTS: u16 = 0x1E07;
    pub const OPERATION_DEFINITION_PARAMETERS_DEFINED: u16 = 0x1E09;
    pub const PARAMETER_DEFINITION_TYPE: u16 = 0x1F01;
    pub const PARAMETER_DEFINITION_DISPLAY_UNITS: u16 = 0x1F03;
    pub const CODEC_DEFINITION_FILE_DESCRIPTOR_CLASS: u16 = 0x2301;
    pub const CODEC_DEFINITION_DATA_DEFINITIONS: u16 = 0x2302;
    pub const CONTAINER_DEFINITION_ESSENCE_IS_IDENTIFIED: u16 = 0x2401;

    pub const DICTIONARY_OPERATION_DEFINITIONS: u16 = 0x2603;
    pub const DICTIONARY_PARAMETER_DEFINITIONS: u16 = 0x2604;
    pub const DICTIONARY_DATA_DEFINITIONS: u16 = 0x2605;
    pub const DICTIONARY_PLUGIN_DEFINITIONS: u16 = 0x2606;
    pub const DICTIONARY_CODEC_DEFINITIONS: u16 = 0x2607;
    pub const DICTIONARY_CONTAINER_DEFINITIONS: u16 = 0x2608;
    pub const DICTIONARY_INTERPOLATION_DEFINITIONS: u16 = 0x2609;
    pub const DICTIONARY_KLV_DATA_DEFINITIONS: u16 = 0x260A;
    pub const DICTIONARY_TAGGED_VALUE_DEFINITIONS: u16 = 0x260B;

    pub const ESSENCE_DATA_MOB_ID: u16 = 0x2701;
    pub const ESSENCE_DATA_DATA: u16 = 0x2702;
    pub const ESSENCE_DATA_SAMPLE_INDEX: u16 = 0x2B01;

    pub const ESSENCE_DESCRIPTOR_LOCATOR: u16 = 0x2F01;
    pub const FILE_DESCRIPTOR_SAMPLE_RATE: u16 = 0x3001;
    pub const FILE_DESCRIPTOR_LENGTH: u16 = 0x3002;
    pub const FILE_DESCRIPTOR_CONTAINER_FORMAT: u16 = 0x3004;
    pub const FILE_DESCRIPTOR_CODEC_DEFINITION: u16 = 0x3005;
    pub const FILE_DESCRIPTOR_LINKED_SLOT_ID: u16 = 0x3006;
    pub const AIFC_DESCRIPTOR_SUMMARY: u16 = 0x3101;
    pub const DIGITAL_IMAGE_DESCRIPTOR_COMPRESSION: u16 = 0x3201;
    pub const DIGITAL_IMAGE_DESCRIPTOR_STORED_HEIGHT: u16 = 0x3202;
    pub const DIGITAL_IMAGE_DESCRIPTOR_STORED_WIDTH: u16 = 0x3203;
    pub const DIGITAL_IMAGE_DESCRIPTOR_FRAME_LAYOUT: u16 = 0x320C;
    pub const DIGITAL_IMAGE_DESCRIPTOR_VIDEO_LINE_MAP: u16 = 0x320D;
    pub const DIGITAL_IMAGE_DESCRIPTOR_IMAGE_ASPECT_RATIO: u16 = 0x320E;
    pub const CDCI_DESCRIPTOR_COMPONENT_WIDTH: u16 = 0x3301;
    pub const CDCI_DESCRIPTOR_HORIZONTAL_SUBSAMPLING: u16 = 0x3302;
    pub const WAVE_DESCRIPTOR_SUMMARY: u16 = 0x3801;

    pub const HEADER_BYTE_ORDER: u16 = 0x3B01;
    pub const HEADER_LAST_MODIFIED: u16 = 0x3B02;
    pub const HEADER_CONTENT: u16 = 0x3B03;
    pub const HEADER_DICTIONARY: u16 = 0x3B04;
    pub const HEADER_VERSION: u16 = 0x3B05;
    pub const HEADER_IDENTIFICATION_LIST: u16 = 0x3B06;
    pub const HEADER_OBJECT_MODEL_VERSION: u16 = 0x3B07;
    pub const HEADER_OPERATIONAL_PATTERN: u16 = 0x3B09;
    pub const HEADER_ESSENCE_CONTAINERS: u16 = 0x3B0A;
    pub const HEADER_DESCRIPTIVE_SCHEMES: u16 = 0x3B0B;

    pub const IDENTIFICATION_COMPANY_NAME: u16 = 0x3C01;
    pub const IDENTIFICATION_PRODUCT_NAME: u16 = 0x3C02;
    pub const IDENTIFICATION_PRODUCT_VERSION: u16 = 0x3C03;
    pub const IDENTIFICATION_PRODUCT_VERSION_STRING: u16 = 0x3C04;
    pub const IDENTIFICATION_PRODUCT_ID: u16 = 0x3C05;
    pub const IDENTIFICATION_DATE: u16 = 0x3C06;
    pub const IDENTIFICATION_TOOLKIT_VERSION: u16 = 0x3C07;
    pub const IDENTIFICATION_PLATFORM: u16 = 0x3C08;
    pub const IDENTIFICATION_GENERATION_AUID: u16 = 0x3C09;

    pub const SOUND_DESCRIPTOR_QUANTIZATION_BITS: u16 = 0x3D01;
    pub const SOUND_DESCRIPTOR_LOCKED: u16 = 0x3D02;
    pub const SOUND_DESCRIPTOR_AUDIO_SAMPLING_RATE: u16 = 0x3D03;
    pub const SOUND_DESCRIPTOR_AUDIO_REF_LEVEL: u16 = 0x3D04;
    pub const SOUND_DESCRIPTOR_ELECTRO_SPATIAL: u16 = 0x3D05;
    pub const SOUND_DESCRIPTOR_COMPRESSION: u16 = 0x3D06;
    pub const SOUND_DESCRIPTOR_CHANNELS: u16 = 0x3D07;
    pub const PCM_DESCRIPTOR_AVERAGE_BPS: u16 = 0x3D09;
    pub const PCM_DESCRIPTOR_BLOCK_ALIGN: u16 = 0x3D0A;
    pub const PCM_DESCRIPTOR_SEQUENCE_OFFSET: u16 = 0x3D0B;
    pub const SOUND_DESCRIPTOR_DIAL_NORM: u16 = 0x3D0C;
    pub const MULTIPLE_DESCRIPTOR_FILE_DESCRIPTORS: u16 = 0x3F01;

    pub const NETWORK_LOCATOR_URL_STRING: u16 = 0x4001;
    pub const TEXT_LOCATOR_NAME: u16 = 0x4101;

    pub const MOB_MOB_ID: u16 = 0x4401;
    pub const MOB_NAME: u16 = 0x4402;
    pub const MOB_SLOTS: u16 = 0x4403;
    pub const MOB_LAST_MODIFIED: u16 = 0x4404;
    pub const MOB_CREATION_TIME: u16 = 0x4405;
    pub const MOB_USER_COMMENTS: u16 = 0x4406;
    pub const MOB_KLV_DATA: u16 = 0x4407;
    pub const MOB_USAGE_CODE: u16 = 0x4408;
    pub const MOB_ATTRIBUTES: u16 = 0x4409;
    pub const COMPOSITION_MOB_DEFAULT_FADE_LENGTH: u16 = 0x4501;
    pub const COMPOSITION_MOB_DEF_FADE_TYPE: u16 = 0x4502;
    pub const COMPOSITION_MOB_DEF_FADE_EDIT_UNIT: u16 = 0x4503;
    pub const COMPOSITION_MOB_RENDERING: u16 = 0x4504;
    pub const SOURCE_MOB_ESSENCE_DESCRIPTION: u16 = 0x4701;

    pub const MOB_SLOT_SLOT_ID: u16 = 0x4801;
    pub const MOB_SLOT_SLOT_NAME: u16 = 0x4802;
    pub const MOB_SLOT_SEGMENT: u16 = 0x4803;
    pub const MOB_SLOT_PHYSICAL_TRACK_NUMBER: u16 = 0x4804;
    pub const EVENT_MOB_SLOT_EDIT_RATE: u16 = 0x4901;
    pub const EVENT_MOB_SLOT_EVENT_SLOT_ORIGIN: u16 = 0x4902;
    pub const TIMELINE_MOB_SLOT_EDIT_RATE: u16 = 0x4B01;
    pub const TIMELINE_MOB_SLOT_ORIGIN: u16 = 0x4B02;
    pub const TIMELINE_MOB_SLOT_MARK_IN: u16 = 0x4B03;
    pub const TIMELINE_MOB_SLOT_MARK_OUT: u16 = 0x4B04;
    pub const TIMELINE_MOB_SLOT_USER_POS: u16 = 0x4B05;

    pub const PARAMETER_DEFINITION: u16 = 0x4C01;
    pub const CONSTANT_VALUE_VALUE: u16 = 0x4D01;
    pub const VARYING_VALUE_INTERPOLATION: u16 = 0x4E01;
    pub const VARYING_VALUE_POINT_LIST: u16 = 0x4E02;
    pub const TAGGED_VALUE_NAME: u16 = 0x5001;
    pub const TAGGED_VALUE_VALUE: u16 = 0x5003;
    pub const KLV_DATA_VALUE: u16 = 0x5101;
    pub const DESCRIPTIVE_MARKER_DESCRIPTION: u16 = 0x6101;
    pub const DESCRIPTIVE_MARKER_DESCRIBED_SLOTS: u16 = 0x6102;
}

// ============================================================================
// Class ids
// ============================================================================

const fn class(d3: u16) -> Auid {
    smpte(0x0d010101, 0x0101, d3, 0x02, 0x06, 0x01, 0x01)
}

const fn meta_class(d2: u16) -> Auid {
    smpte(0x0d010101, d2, 0x0000, 0x02, 0x06, 0x01, 0x01)
}

/// Class ids of the built-in object model.
pub mod class_id {
    use super::{class, meta_class, Auid};

    pub const ROOT: Auid = Auid::new(0xb3b398a5, 0x1c90, 0x11d4, [0x80, 0x53, 0x08, 0x00, 0x36, 0x21, 0x08, 0x83]);

    pub const INTERCHANGE_OBJECT: Auid = class(0x0100);
    pub const COMPONENT: Auid = class(0x0200);
    pub const SEGMENT: Auid = class(0x0300);
    pub const EDGE_CODE: Auid = class(0x0400);
    pub const ESSENCE_GROUP: Auid = class(0x0500);
    pub const EVENT: Auid = class(0x0600);
    pub const GPI_TRIGGER: Auid = class(0x0700);
    pub const COMMENT_MARKER: Auid = class(0x0800);
    pub const FILLER: Auid = class(0x0900);
    pub const OPERATION_GROUP: Auid = class(0x0A00);
    pub const NESTED_SCOPE: Auid = class(0x0B00);
    pub const PULLDOWN: Auid = class(0x0C00);
    pub const SCOPE_REFERENCE: Auid = class(0x0D00);
    pub const SELECTOR: Auid = class(0x0E00);
    pub const SEQUENCE: Auid = class(0x0F00);
    pub const SOURCE_REFERENCE: Auid = class(0x1000);
    pub const SOURCE_CLIP: Auid = class(0x1100);
    pub const TEXT_CLIP: Auid = class(0x1200);
    pub const HTML_CLIP: Auid = class(0x1300);
    pub const TIMECODE: Auid = class(0x1400);
    pub const TIMECODE_STREAM: Auid = class(0x1500);
    pub const TIMECODE_STREAM_12M: Auid = class(0x1600);
    pub const TRANSITION: Auid = class(0x1700);
    pub const CONTENT_STORAGE: Auid = class(0x1800);
    pub const CONTROL_POINT: Auid = class(0x1900);
    pub const DEFINITION_OBJECT: Auid = class(0x1A00);
    pub const DATA_DEFINITION: Auid = class(0x1B00);
    pub const OPERATION_DEFINITION: Auid = class(0x1C00);
    pub const PARAMETER_DEFINITION: Auid = class(0x1D00);
    pub const PLUGIN_DEFINITION: Auid = class(0x1E00);
    pub const CODEC_DEFINITION: Auid = class(0x1F00);
    pub const CONTAINER_DEFINITION: Auid = class(0x2000);
    pub const INTERPOLATION_DEFINITION: Auid = class(0x2100);
    pub const DICTIONARY: Auid = class(0x2200);
    pub const ESSENCE_DATA: Auid = class(0x2300);
    pub const ESSENCE_DESCRIPTOR: Auid = class(0x2400);
    pub const FILE_DESCRIPTOR: Auid = class(0x2500);
    pub const AIFC_DESCRIPTOR: Auid = class(0x2600);
    pub const DIGITAL_IMAGE_DESCRIPTOR: Auid = class(0x2700);
    pub const CDCI_DESCRIPTOR: Auid = class(0x2800);
    pub const RGBA_DESCRIPTOR: Auid = class(0x2900);
    pub const HTML_DESCRIPTOR: Auid = class(0x2A00);
    pub const TIFF_DESCRIPTOR: Auid = class(0x2B00);
    pub const WAVE_DESCRIPTOR: Auid = class(0x2C00);
    pub const FILM_DESCRIPTOR: Auid = class(0x2D00);
    pub const TAPE_DESCRIPTOR: Auid = class(0x2E00);
    pub const HEADER: Auid = class(0x2F00);
    pub const IDENTIFICATION: Auid = class(0x3000);
    pub const LOCATOR: Auid = class(0x3100);
    pub const NETWORK_LOCATOR: Auid = class(0x3200);
    pub const TEXT_LOCATOR: Auid = class(0x3300);
    pub const MOB: Auid = class(0x3400);
    pub const COMPOSITION_MOB: Auid = class(0x3500);
    pub const MASTER_MOB: Auid = class(0x3600);
    pub const SOURCE_MOB: Auid = class(0x3700);
    pub const MOB_SLOT: Auid = class(0x3800);
    pub const EVENT_MOB_SLOT: Auid = class(0x3900);
    pub const STATIC_MOB_SLOT: Auid = class(0x3A00);
    pub const TIMELINE_MOB_SLOT: Auid = class(0x3B00);
    pub const PARAMETER: Auid = class(0x3C00);
    pub const CONSTANT_VALUE: Auid = class(0x3D00);
    pub const VARYING_VALUE: Auid = class(0x3E00);
    pub const TAGGED_VALUE: Auid = class(0x3F00);
    pub const KLV_DATA: Auid = class(0x4000);
    pub const DESCRIPTIVE_MARKER: Auid = class(0x4100);
    pub const SOUND_DESCRIPTOR: Auid = class(0x4200);
    pub const DATA_ESSENCE_DESCRIPTOR: Auid = class(0x4300);
    pub const MULTIPLE_DESCRIPTOR: Auid = class(0x4400);
    pub const DESCRIPTIVE_CLIP: Auid = class(0x4500);
    pub const AES3_PCM_DESCRIPTOR: Auid = class(0x4700);
    pub const PCM_DESCRIPTOR: Auid = class(0x4800);
    pub const PHYSICAL_DESCRIPTOR: Auid = class(0x4900);
    pub const IMPORT_DESCRIPTOR: Auid = class(0x4A00);
    pub const RECORDING_DESCRIPTOR: Auid = class(0x4B00);
    pub const TAGGED_VALUE_DEFINITION: Auid = class(0x4C00);
    pub const KLV_DATA_DEFINITION: Auid = class(0x4D00);
    pub const AUXILIARY_DESCRIPTOR: Auid = class(0x4E00);
    pub const RIFF_CHUNK: Auid = class(0x4F00);
    pub const BWF_IMPORT_DESCRIPTOR: Auid = class(0x5000);

    pub const CLASS_DEFINITION: Auid = meta_class(0x0201);
    pub const PROPERTY_DEFINITION: Auid = meta_class(0x0202);
    pub const TYPE_DEFINITION: Auid = meta_class(0x0203);
    pub const META_DEFINITION: Auid = meta_class(0x0224);
    pub const META_DICTIONARY: Auid = meta_class(0x0225);
}

// ============================================================================
// Type ids
// ============================================================================

const fn type_uid(d1: u32) -> Auid {
    Auid::new(d1, 0x0000, 0x0000, [0x06, 0x0e, 0x2b, 0x34, 0x01, 0x04, 0x01, 0x01])
}

/// Type definition ids, as stored inside Indirect values.
pub mod type_id {
    use super::{type_uid, Auid};

    pub const UINT8: Auid = type_uid(0x01010100);
    pub const UINT16: Auid = type_uid(0x01010200);
    pub const UINT32: Auid = type_uid(0x01010300);
    pub const UINT64: Auid = type_uid(0x01010400);
    pub const INT8: Auid = type_uid(0x01010500);
    pub const INT16: Auid = type_uid(0x01010600);
    pub const INT32: Auid = type_uid(0x01010700);
    pub const INT64: Auid = type_uid(0x01010800);
    pub const POSITION: Auid = type_uid(0x01012001);
    pub const LENGTH: Auid = type_uid(0x01012002);
    pub const AUID: Auid = type_uid(0x01030100);
    pub const MOB_ID: Auid = type_uid(0x01030200);
    pub const BOOLEAN: Auid = type_uid(0x01040100);
    pub const STRING: Auid = type_uid(0x01100200);
    pub const RATIONAL: Auid = type_uid(0x03010100);
    pub const TIME_STAMP: Auid = type_uid(0x03010700);
    pub const INDIRECT: Auid = type_uid(0x04100300);
}

// ============================================================================
// Definition objects
// ============================================================================

/// Data kinds carried by components and slots.
pub mod data_def {
    use super::{smpte, Auid};

    pub const PICTURE: Auid = smpte(0x0d010301, 0x0102, 0x0100, 0x04, 0x01, 0x01, 0x01);
    pub const LEGACY_PICTURE: Auid = Auid::new(0x6f3c8ce1, 0x6cef, 0x11d2, [0x80, 0x7d, 0x00, 0x60, 0x08, 0x14, 0x3e, 0x6f]);
    pub const SOUND: Auid = smpte(0x0d010301, 0x0102, 0x0300, 0x04, 0x01, 0x01, 0x01);
    pub const LEGACY_SOUND: Auid = Auid::new(0x78e1ebe1, 0x6cef, 0x11d2, [0x80, 0x7d, 0x00, 0x60, 0x08, 0x14, 0x3e, 0x6f]);
    pub const TIMECODE: Auid = smpte(0x0d010301, 0x0101, 0x0100, 0x04, 0x01, 0x01, 0x01);
    pub const LEGACY_TIMECODE: Auid = Auid::new(0x7f275e81, 0x77e5, 0x11d2, [0x80, 0x7f, 0x00, 0x60, 0x08, 0x14, 0x3e, 0x6f]);
    pub const DESCRIPTIVE_METADATA: Auid = smpte(0x0d010301, 0x0110, 0x0100, 0x04, 0x01, 0x01, 0x01);

    pub fn is_sound(id: &Auid) -> bool {
        *id == SOUND || *id == LEGACY_SOUND
    }

    pub fn is_picture(id: &Auid) -> bool {
        *id == PICTURE || *id == LEGACY_PICTURE
    }

    pub fn is_timecode(id: &Auid) -> bool {
        *id == TIMECODE || *id == LEGACY_TIMECODE
    }
}

/// Operation (effect) definitions.
pub mod operation_def {
    use super::Auid;

    const AVID_A: [u8; 8] = [0x8a, 0x29, 0x00, 0x60, 0x08, 0x14, 0x3e, 0x6f];
    const AVID_B: [u8; 8] = [0x8a, 0x38, 0x00, 0x50, 0x04, 0x0e, 0x9b, 0x15];
    const AVID_C: [u8; 8] = [0x8a, 0x4c, 0x00, 0x50, 0x04, 0x0e, 0x9b, 0x15];

    pub const MONO_AUDIO_DISSOLVE: Auid = Auid::new(0x0c3bea44, 0xfc05, 0x11d2, AVID_A);
    pub const TWO_PARAMETER_MONO_AUDIO_DISSOLVE: Auid = Auid::new(0x2311bd90, 0xb5da, 0x11d3, AVID_C);
    pub const MONO_AUDIO_GAIN: Auid = Auid::new(0x9d2ea890, 0x0968, 0x11d3, AVID_B);
    pub const MONO_AUDIO_PAN: Auid = Auid::new(0x9d2ea893, 0x0968, 0x11d3, AVID_B);
    pub const MONO_AUDIO_MIXDOWN: Auid = Auid::new(0x8d896ad0, 0x2261, 0x11d3, AVID_C);
    pub const STEREO_AUDIO_GAIN: Auid = Auid::new(0x9d2ea894, 0x0968, 0x11d3, AVID_B);
    pub const AUDIO_CHANNEL_COMBINER: Auid =
        Auid::new(0x04100205, 0x0000, 0x0000, [0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x0c]);
}

/// Effect parameter definitions.
pub mod parameter_def {
    use super::Auid;

    const AVID: [u8; 8] = [0x8a, 0x4c, 0x00, 0x50, 0x04, 0x0e, 0x9b, 0x15];

    pub const LEVEL: Auid = Auid::new(0xe4962320, 0x2267, 0x11d3, AVID);
    pub const AMPLITUDE: Auid = Auid::new(0xe4962321, 0x2267, 0x11d3, AVID);
    pub const PAN: Auid = Auid::new(0xe4962322, 0x2267, 0x11d3, AVID);
}

/// Interpolation definitions used by varying values.
pub mod interpolation_def {
    use super::Auid;

    const AVID: [u8; 8] = [0x80, 0xa9, 0x00, 0x60, 0x08, 0x14, 0x3e, 0x6f];

    pub const NONE: Auid = Auid::new(0x5b6c85a3, 0x0ede, 0x11d3, AVID);
    pub const LINEAR: Auid = Auid::new(0x5b6c85a4, 0x0ede, 0x11d3, AVID);
    pub const CONSTANT: Auid = Auid::new(0x5b6c85a5, 0x0ede, 0x11d3, AVID);
    pub const BSPLINE: Auid = Auid::new(0x5b6c85a6, 0x0ede, 0x11d3, AVID);
    pub const LOG: Auid = Auid::new(0x15829ec3, 0x1f24, 0x458a, [0x96, 0x0d, 0xc6, 0x5b, 0xb2, 0x3c, 0x2a, 0xa1]);
    pub const POWER: Auid = Auid::new(0xc09153f7, 0xbd18, 0x4e5a, [0xad, 0x09, 0xcb, 0xdd, 0x65, 0x4f, 0xa0, 0x01]);
}

/// Mob usage codes.
pub mod usage {
    use super::{smpte, Auid};

    pub const SUB_CLIP: Auid = smpte(0x0d010102, 0x0101, 0x0100, 0x04, 0x01, 0x01, 0x05);
    pub const ADJUSTED_CLIP: Auid = smpte(0x0d010102, 0x0101, 0x0200, 0x04, 0x01, 0x01, 0x05);
    pub const TOP_LEVEL: Auid = smpte(0x0d010102, 0x0101, 0x0500, 0x04, 0x01, 0x01, 0x05);
    pub const LOWER_LEVEL: Auid = smpte(0x0d010102, 0x0101, 0x0600, 0x04, 0x01, 0x01, 0x05);
}

/// Operational patterns.
pub mod op_def {
    use super::{smpte, Auid};

    pub const EDIT_PROTOCOL: Auid = smpte(0x0d011201, 0x0100, 0x0000, 0x04, 0x01, 0x01, 0x05);
    pub const UNCONSTRAINED: Auid = smpte(0x0d011201, 0x0200, 0x0000, 0x04, 0x01, 0x01, 0x05);
}

/// Essence container definitions.
pub mod container_def {
    use super::Auid;

    const AVID: [u8; 8] = [0x80, 0x9b, 0x00, 0x60, 0x08, 0x14, 0x3e, 0x6f];

    pub const AAF: Auid = Auid::new(0x4313b571, 0xd8ba, 0x11d2, AVID);
    pub const EXTERNAL: Auid = Auid::new(0x4313b572, 0xd8ba, 0x11d2, AVID);
    pub const OMF: Auid = Auid::new(0x4313b573, 0xd8ba, 0x11d2, AVID);
}
