//! Built-in AAF object model: classes, inheritance and their properties.
//!
//! Files declare their own extensions in the MetaDictionary; those are
//! merged on top of this table when a file is opened.

use crate::core::defs::{class_id as c, pid};
use crate::core::Auid;

/// Built-in property: id, name, optional flag.
pub(crate) struct PropSpec {
    pub pid: u16,
    pub name: &'static str,
    pub optional: bool,
}

/// Built-in class description.
pub(crate) struct ClassSpec {
    pub id: Auid,
    pub name: &'static str,
    pub parent: Option<Auid>,
    pub concrete: bool,
    pub props: &'static [PropSpec],
}

const fn req(pid: u16, name: &'static str) -> PropSpec {
    PropSpec { pid, name, optional: false }
}

const fn opt(pid: u16, name: &'static str) -> PropSpec {
    PropSpec { pid, name, optional: true }
}

const fn class(
    id: Auid,
    name: &'static str,
    parent: Option<Auid>,
    concrete: bool,
    props: &'static [PropSpec],
) -> ClassSpec {
    ClassSpec { id, name, parent, concrete, props }
}

const IO: Option<Auid> = Some(c::INTERCHANGE_OBJECT);

pub(crate) static BUILTIN_CLASSES: &[ClassSpec] = &[
    class(c::ROOT, "Root", None, true, &[
        req(pid::ROOT_META_DICTIONARY, "MetaDictionary"),
        req(pid::ROOT_HEADER, "Header"),
    ]),
    class(c::INTERCHANGE_OBJECT, "InterchangeObject", None, false, &[
        opt(pid::INTERCHANGE_OBJECT_OBJ_CLASS, "ObjClass"),
        opt(pid::INTERCHANGE_OBJECT_GENERATION, "Generation"),
    ]),

    // Meta model
    class(c::META_DICTIONARY, "MetaDictionary", None, true, &[
        opt(pid::META_DICTIONARY_CLASS_DEFINITIONS, "ClassDefinitions"),
        opt(pid::META_DICTIONARY_TYPE_DEFINITIONS, "TypeDefinitions"),
    ]),
    class(c::META_DEFINITION, "MetaDefinition", None, false, &[
        req(pid::META_DEFINITION_IDENTIFICATION, "Identification"),
        req(pid::META_DEFINITION_NAME, "Name"),
        opt(pid::META_DEFINITION_DESCRIPTION, "Description"),
    ]),
    class(c::CLASS_DEFINITION, "ClassDefinition", Some(c::META_DEFINITION), true, &[
        req(pid::CLASS_DEFINITION_PARENT_CLASS, "ParentClass"),
        opt(pid::CLASS_DEFINITION_PROPERTIES, "Properties"),
        req(pid::CLASS_DEFINITION_IS_CONCRETE, "IsConcrete"),
    ]),
    class(c::PROPERTY_DEFINITION, "PropertyDefinition", Some(c::META_DEFINITION), true, &[
        req(pid::PROPERTY_DEFINITION_TYPE, "Type"),
        req(pid::PROPERTY_DEFINITION_IS_OPTIONAL, "IsOptional"),
        req(pid::PROPERTY_DEFINITION_LOCAL_IDENTIFICATION, "LocalIdentification"),
        opt(pid::PROPERTY_DEFINITION_IS_UNIQUE_IDENTIFIER, "IsUniqueIdentifier"),
    ]),
    class(c::TYPE_DEFINITION, "TypeDefinition", Some(c::META_DEFINITION), false, &[]),

    // Header and storage
    class(c::HEADER, "Header", IO, true, &[
        req(pid::HEADER_BYTE_ORDER, "ByteOrder"),
        req(pid::HEADER_LAST_MODIFIED, "LastModified"),
        req(pid::HEADER_CONTENT, "Content"),
        req(pid::HEADER_DICTIONARY, "Dictionary"),
        req(pid::HEADER_VERSION, "Version"),
        req(pid::HEADER_IDENTIFICATION_LIST, "IdentificationList"),
        opt(pid::HEADER_OBJECT_MODEL_VERSION, "ObjectModelVersion"),
        opt(pid::HEADER_OPERATIONAL_PATTERN, "OperationalPattern"),
        opt(pid::HEADER_ESSENCE_CONTAINERS, "EssenceContainers"),
        opt(pid::HEADER_DESCRIPTIVE_SCHEMES, "DescriptiveSchemes"),
    ]),
    class(c::IDENTIFICATION, "Identification", IO, true, &[
        req(pid::IDENTIFICATION_COMPANY_NAME, "CompanyName"),
        req(pid::IDENTIFICATION_PRODUCT_NAME, "ProductName"),
        opt(pid::IDENTIFICATION_PRODUCT_VERSION, "ProductVersion"),
        req(pid::IDENTIFICATION_PRODUCT_VERSION_STRING, "ProductVersionString"),
        req(pid::IDENTIFICATION_PRODUCT_ID, "ProductID"),
        req(pid::IDENTIFICATION_DATE, "Date"),
        opt(pid::IDENTIFICATION_TOOLKIT_VERSION, "ToolkitVersion"),
        opt(pid::IDENTIFICATION_PLATFORM, "Platform"),
        req(pid::IDENTIFICATION_GENERATION_AUID, "GenerationAUID"),
    ]),
    class(c::CONTENT_STORAGE, "ContentStorage", IO, true, &[
        req(pid::CONTENT_STORAGE_MOBS, "Mobs"),
        opt(pid::CONTENT_STORAGE_ESSENCE_DATA, "EssenceData"),
    ]),
    class(c::DICTIONARY, "Dictionary", IO, true, &[
        opt(pid::DICTIONARY_OPERATION_DEFINITIONS, "OperationDefinitions"),
        opt(pid::DICTIONARY_PARAMETER_DEFINITIONS, "ParameterDefinitions"),
        opt(pid::DICTIONARY_DATA_DEFINITIONS, "DataDefinitions"),
        opt(pid::DICTIONARY_PLUGIN_DEFINITIONS, "PluginDefinitions"),
        opt(pid::DICTIONARY_CODEC_DEFINITIONS, "CodecDefinitions"),
        opt(pid::DICTIONARY_CONTAINER_DEFINITIONS, "ContainerDefinitions"),
        opt(pid::DICTIONARY_INTERPOLATION_DEFINITIONS, "InterpolationDefinitions"),
        opt(pid::DICTIONARY_KLV_DATA_DEFINITIONS, "KLVDataDefinitions"),
        opt(pid::DICTIONARY_TAGGED_VALUE_DEFINITIONS, "TaggedValueDefinitions"),
    ]),
    class(c::ESSENCE_DATA, "EssenceData", IO, true, &[
        req(pid::ESSENCE_DATA_MOB_ID, "MobID"),
        req(pid::ESSENCE_DATA_DATA, "Data"),
        opt(pid::ESSENCE_DATA_SAMPLE_INDEX, "SampleIndex"),
    ]),

    // Definitions
    class(c::DEFINITION_OBJECT, "DefinitionObject", IO, false, &[
        req(pid::DEFINITION_OBJECT_IDENTIFICATION, "Identification"),
        req(pid::DEFINITION_OBJECT_NAME, "Name"),
        opt(pid::DEFINITION_OBJECT_DESCRIPTION, "Description"),
    ]),
    class(c::DATA_DEFINITION, "DataDefinition", Some(c::DEFINITION_OBJECT), true, &[]),
    class(c::OPERATION_DEFINITION, "OperationDefinition", Some(c::DEFINITION_OBJECT), true, &[
        req(pid::OPERATION_DEFINITION_DATA_DEFINITION, "DataDefinition"),
        opt(pid::OPERATION_DEFINITION_IS_TIME_WARP, "IsTimeWarp"),
        req(pid::OPERATION_DEFINITION_NUMBER_INPUTS, "NumberInputs"),
        opt(pid::OPERATION_DEFINITION_PARAMETERS_DEFINED, "ParametersDefined"),
    ]),
    class(c::PARAMETER_DEFINITION, "ParameterDefinition", Some(c::DEFINITION_OBJECT), true, &[
        req(pid::PARAMETER_DEFINITION_TYPE, "Type"),
        opt(pid::PARAMETER_DEFINITION_DISPLAY_UNITS, "DisplayUnits"),
    ]),
    class(c::PLUGIN_DEFINITION, "PluginDefinition", Some(c::DEFINITION_OBJECT), true, &[]),
    class(c::CODEC_DEFINITION, "CodecDefinition", Some(c::DEFINITION_OBJECT), true, &[
        req(pid::CODEC_DEFINITION_FILE_DESCRIPTOR_CLASS, "FileDescriptorClass"),
        req(pid::CODEC_DEFINITION_DATA_DEFINITIONS, "DataDefinitions"),
    ]),
    class(c::CONTAINER_DEFINITION, "ContainerDefinition", Some(c::DEFINITION_OBJECT), true, &[
        opt(pid::CONTAINER_DEFINITION_ESSENCE_IS_IDENTIFIED, "EssenceIsIdentified"),
    ]),
    class(c::INTERPOLATION_DEFINITION, "InterpolationDefinition", Some(c::DEFINITION_OBJECT), true, &[]),
    class(c::TAGGED_VALUE_DEFINITION, "TaggedValueDefinition", Some(c::DEFINITION_OBJECT), true, &[]),
    class(c::KLV_DATA_DEFINITION, "KLVDataDefinition", Some(c::DEFINITION_OBJECT), true, &[]),

    // Mobs
    class(c::MOB, "Mob", IO, false, &[
        req(pid::MOB_MOB_ID, "MobID"),
        opt(pid::MOB_NAME, "Name"),
        req(pid::MOB_SLOTS, "Slots"),
        req(pid::MOB_LAST_MODIFIED, "LastModified"),
        req(pid::MOB_CREATION_TIME, "CreationTime"),
        opt(pid::MOB_USER_COMMENTS, "UserComments"),
        opt(pid::MOB_KLV_DATA, "KLVData"),
        opt(pid::MOB_USAGE_CODE, "UsageCode"),
        opt(pid::MOB_ATTRIBUTES, "Attributes"),
    ]),
    class(c::COMPOSITION_MOB, "CompositionMob", Some(c::MOB), true, &[
        opt(pid::COMPOSITION_MOB_DEFAULT_FADE_LENGTH, "DefaultFadeLength"),
        opt(pid::COMPOSITION_MOB_DEF_FADE_TYPE, "DefFadeType"),
        opt(pid::COMPOSITION_MOB_DEF_FADE_EDIT_UNIT, "DefFadeEditUnit"),
        opt(pid::COMPOSITION_MOB_RENDERING, "Rendering"),
    ]),
    class(c::MASTER_MOB, "MasterMob", Some(c::MOB), true, &[]),
    class(c::SOURCE_MOB, "SourceMob", Some(c::MOB), true, &[
        req(pid::SOURCE_MOB_ESSENCE_DESCRIPTION, "EssenceDescription"),
    ]),

    // Slots
    class(c::MOB_SLOT, "MobSlot", IO, false, &[
        req(pid::MOB_SLOT_SLOT_ID, "SlotID"),
        opt(pid::MOB_SLOT_SLOT_NAME, "SlotName"),
        req(pid::MOB_SLOT_SEGMENT, "Segment"),
        opt(pid::MOB_SLOT_PHYSICAL_TRACK_NUMBER, "PhysicalTrackNumber"),
    ]),
    class(c::EVENT_MOB_SLOT, "EventMobSlot", Some(c::MOB_SLOT), true, &[
        req(pid::EVENT_MOB_SLOT_EDIT_RATE, "EditRate"),
        opt(pid::EVENT_MOB_SLOT_EVENT_SLOT_ORIGIN, "EventSlotOrigin"),
    ]),
    class(c::STATIC_MOB_SLOT, "StaticMobSlot", Some(c::MOB_SLOT), true, &[]),
    class(c::TIMELINE_MOB_SLOT, "TimelineMobSlot", Some(c::MOB_SLOT), true, &[
        req(pid::TIMELINE_MOB_SLOT_EDIT_RATE, "EditRate"),
        req(pid::TIMELINE_MOB_SLOT_ORIGIN, "Origin"),
        opt(pid::TIMELINE_MOB_SLOT_MARK_IN, "MarkIn"),
        opt(pid::TIMELINE_MOB_SLOT_MARK_OUT, "MarkOut"),
        opt(pid::TIMELINE_MOB_SLOT_USER_POS, "UserPos"),
    ]),

    // Components
    class(c::COMPONENT, "Component", IO, false, &[
        req(pid::COMPONENT_DATA_DEFINITION, "DataDefinition"),
        opt(pid::COMPONENT_LENGTH, "Length"),
        opt(pid::COMPONENT_KLV_DATA, "KLVData"),
        opt(pid::COMPONENT_USER_COMMENTS, "UserComments"),
        opt(pid::COMPONENT_ATTRIBUTES, "Attributes"),
    ]),
    class(c::SEGMENT, "Segment", Some(c::COMPONENT), false, &[]),
    class(c::TRANSITION, "Transition", Some(c::COMPONENT), true, &[
        req(pid::TRANSITION_OPERATION_GROUP, "OperationGroup"),
        req(pid::TRANSITION_CUT_POINT, "CutPoint"),
    ]),
    class(c::SEQUENCE, "Sequence", Some(c::SEGMENT), true, &[
        req(pid::SEQUENCE_COMPONENTS, "Components"),
    ]),
    class(c::FILLER, "Filler", Some(c::SEGMENT), true, &[]),
    class(c::SOURCE_REFERENCE, "SourceReference", Some(c::SEGMENT), false, &[
        opt(pid::SOURCE_REFERENCE_SOURCE_ID, "SourceID"),
        req(pid::SOURCE_REFERENCE_SOURCE_MOB_SLOT_ID, "SourceMobSlotID"),
        opt(pid::SOURCE_REFERENCE_CHANNEL_IDS, "ChannelIDs"),
        opt(pid::SOURCE_REFERENCE_MONO_SOURCE_SLOT_IDS, "MonoSourceSlotIDs"),
    ]),
    class(c::SOURCE_CLIP, "SourceClip", Some(c::SOURCE_REFERENCE), true, &[
        opt(pid::SOURCE_CLIP_START_TIME, "StartTime"),
        opt(pid::SOURCE_CLIP_FADE_IN_LENGTH, "FadeInLength"),
        opt(pid::SOURCE_CLIP_FADE_IN_TYPE, "FadeInType"),
        opt(pid::SOURCE_CLIP_FADE_OUT_LENGTH, "FadeOutLength"),
        opt(pid::SOURCE_CLIP_FADE_OUT_TYPE, "FadeOutType"),
    ]),
    class(c::TEXT_CLIP, "TextClip", Some(c::SOURCE_REFERENCE), false, &[]),
    class(c::EVENT, "Event", Some(c::SEGMENT), false, &[
        req(pid::EVENT_POSITION, "Position"),
        opt(pid::EVENT_COMMENT, "Comment"),
    ]),
    class(c::COMMENT_MARKER, "CommentMarker", Some(c::EVENT), true, &[
        opt(pid::COMMENT_MARKER_ANNOTATION, "Annotation"),
    ]),
    class(c::DESCRIPTIVE_MARKER, "DescriptiveMarker", Some(c::COMMENT_MARKER), true, &[
        opt(pid::DESCRIPTIVE_MARKER_DESCRIPTION, "Description"),
        opt(pid::DESCRIPTIVE_MARKER_DESCRIBED_SLOTS, "DescribedSlots"),
    ]),
    class(c::GPI_TRIGGER, "GPITrigger", Some(c::EVENT), true, &[]),
    class(c::TIMECODE, "Timecode", Some(c::SEGMENT), true, &[
        req(pid::TIMECODE_START, "Start"),
        req(pid::TIMECODE_FPS, "FPS"),
        req(pid::TIMECODE_DROP, "Drop"),
    ]),
    class(c::TIMECODE_STREAM, "TimecodeStream", Some(c::SEGMENT), false, &[]),
    class(c::EDGE_CODE, "EdgeCode", Some(c::SEGMENT), true, &[]),
    class(c::PULLDOWN, "Pulldown", Some(c::SEGMENT), true, &[]),
    class(c::OPERATION_GROUP, "OperationGroup", Some(c::SEGMENT), true, &[
        req(pid::OPERATION_GROUP_OPERATION, "Operation"),
        opt(pid::OPERATION_GROUP_INPUT_SEGMENTS, "InputSegments"),
        opt(pid::OPERATION_GROUP_PARAMETERS, "Parameters"),
        opt(pid::OPERATION_GROUP_BYPASS_OVERRIDE, "BypassOverride"),
        opt(pid::OPERATION_GROUP_RENDERING, "Rendering"),
    ]),
    class(c::NESTED_SCOPE, "NestedScope", Some(c::SEGMENT), true, &[
        req(pid::NESTED_SCOPE_SLOTS, "Slots"),
    ]),
    class(c::SCOPE_REFERENCE, "ScopeReference", Some(c::SEGMENT), true, &[]),
    class(c::SELECTOR, "Selector", Some(c::SEGMENT), true, &[
        req(pid::SELECTOR_SELECTED, "Selected"),
        opt(pid::SELECTOR_ALTERNATES, "Alternates"),
    ]),
    class(c::ESSENCE_GROUP, "EssenceGroup", Some(c::SEGMENT), true, &[
        req(pid::ESSENCE_GROUP_CHOICES, "Choices"),
        opt(pid::ESSENCE_GROUP_STILL_FRAME, "StillFrame"),
    ]),

    // Parameters
    class(c::PARAMETER, "Parameter", IO, false, &[
        req(pid::PARAMETER_DEFINITION, "Definition"),
    ]),
    class(c::CONSTANT_VALUE, "ConstantValue", Some(c::PARAMETER), true, &[
        req(pid::CONSTANT_VALUE_VALUE, "Value"),
    ]),
    class(c::VARYING_VALUE, "VaryingValue", Some(c::PARAMETER), true, &[
        req(pid::VARYING_VALUE_INTERPOLATION, "Interpolation"),
        req(pid::VARYING_VALUE_POINT_LIST, "PointList"),
    ]),
    class(c::CONTROL_POINT, "ControlPoint", IO, true, &[
        req(pid::CONTROL_POINT_VALUE, "Value"),
        req(pid::CONTROL_POINT_TIME, "Time"),
        opt(pid::CONTROL_POINT_EDIT_HINT, "EditHint"),
    ]),
    class(c::TAGGED_VALUE, "TaggedValue", IO, true, &[
        req(pid::TAGGED_VALUE_NAME, "Name"),
        req(pid::TAGGED_VALUE_VALUE, "Value"),
    ]),
    class(c::KLV_DATA, "KLVData", IO, true, &[
        req(pid::KLV_DATA_VALUE, "Value"),
    ]),

    // Essence descriptors
    class(c::ESSENCE_DESCRIPTOR, "EssenceDescriptor", IO, false, &[
        opt(pid::ESSENCE_DESCRIPTOR_LOCATOR, "Locator"),
    ]),
    class(c::FILE_DESCRIPTOR, "FileDescriptor", Some(c::ESSENCE_DESCRIPTOR), false, &[
        req(pid::FILE_DESCRIPTOR_SAMPLE_RATE, "SampleRate"),
        req(pid::FILE_DESCRIPTOR_LENGTH, "Length"),
        opt(pid::FILE_DESCRIPTOR_CONTAINER_FORMAT, "ContainerFormat"),
        opt(pid::FILE_DESCRIPTOR_CODEC_DEFINITION, "CodecDefinition"),
        opt(pid::FILE_DESCRIPTOR_LINKED_SLOT_ID, "LinkedSlotID"),
    ]),
    class(c::AIFC_DESCRIPTOR, "AIFCDescriptor", Some(c::FILE_DESCRIPTOR), true, &[
        req(pid::AIFC_DESCRIPTOR_SUMMARY, "Summary"),
    ]),
    class(c::WAVE_DESCRIPTOR, "WAVEDescriptor", Some(c::FILE_DESCRIPTOR), true, &[
        req(pid::WAVE_DESCRIPTOR_SUMMARY, "Summary"),
    ]),
    class(c::TIFF_DESCRIPTOR, "TIFFDescriptor", Some(c::FILE_DESCRIPTOR), true, &[]),
    class(c::SOUND_DESCRIPTOR, "SoundDescriptor", Some(c::FILE_DESCRIPTOR), true, &[
        req(pid::SOUND_DESCRIPTOR_AUDIO_SAMPLING_RATE, "AudioSamplingRate"),
        opt(pid::SOUND_DESCRIPTOR_LOCKED, "Locked"),
        opt(pid::SOUND_DESCRIPTOR_AUDIO_REF_LEVEL, "AudioRefLevel"),
        opt(pid::SOUND_DESCRIPTOR_ELECTRO_SPATIAL, "ElectroSpatial"),
        req(pid::SOUND_DESCRIPTOR_CHANNELS, "Channels"),
        req(pid::SOUND_DESCRIPTOR_QUANTIZATION_BITS, "QuantizationBits"),
        opt(pid::SOUND_DESCRIPTOR_DIAL_NORM, "DialNorm"),
        opt(pid::SOUND_DESCRIPTOR_COMPRESSION, "Compression"),
    ]),
    class(c::PCM_DESCRIPTOR, "PCMDescriptor", Some(c::SOUND_DESCRIPTOR), true, &[
        req(pid::PCM_DESCRIPTOR_BLOCK_ALIGN, "BlockAlign"),
        opt(pid::PCM_DESCRIPTOR_SEQUENCE_OFFSET, "SequenceOffset"),
        req(pid::PCM_DESCRIPTOR_AVERAGE_BPS, "AverageBPS"),
    ]),
    class(c::AES3_PCM_DESCRIPTOR, "AES3PCMDescriptor", Some(c::PCM_DESCRIPTOR), true, &[]),
    class(c::DIGITAL_IMAGE_DESCRIPTOR, "DigitalImageDescriptor", Some(c::FILE_DESCRIPTOR), false, &[
        opt(pid::DIGITAL_IMAGE_DESCRIPTOR_COMPRESSION, "Compression"),
        req(pid::DIGITAL_IMAGE_DESCRIPTOR_STORED_HEIGHT, "StoredHeight"),
        req(pid::DIGITAL_IMAGE_DESCRIPTOR_STORED_WIDTH, "StoredWidth"),
        req(pid::DIGITAL_IMAGE_DESCRIPTOR_FRAME_LAYOUT, "FrameLayout"),
        req(pid::DIGITAL_IMAGE_DESCRIPTOR_VIDEO_LINE_MAP, "VideoLineMap"),
        req(pid::DIGITAL_IMAGE_DESCRIPTOR_IMAGE_ASPECT_RATIO, "ImageAspectRatio"),
    ]),
    class(c::CDCI_DESCRIPTOR, "CDCIDescriptor", Some(c::DIGITAL_IMAGE_DESCRIPTOR), true, &[
        req(pid::CDCI_DESCRIPTOR_COMPONENT_WIDTH, "ComponentWidth"),
        req(pid::CDCI_DESCRIPTOR_HORIZONTAL_SUBSAMPLING, "HorizontalSubsampling"),
    ]),
    class(c::RGBA_DESCRIPTOR, "RGBADescriptor", Some(c::DIGITAL_IMAGE_DESCRIPTOR), true, &[]),
    class(c::MULTIPLE_DESCRIPTOR, "MultipleDescriptor", Some(c::FILE_DESCRIPTOR), true, &[
        req(pid::MULTIPLE_DESCRIPTOR_FILE_DESCRIPTORS, "FileDescriptors"),
    ]),
    class(c::DATA_ESSENCE_DESCRIPTOR, "DataEssenceDescriptor", Some(c::FILE_DESCRIPTOR), true, &[]),
    class(c::PHYSICAL_DESCRIPTOR, "PhysicalDescriptor", Some(c::ESSENCE_DESCRIPTOR), false, &[]),
    class(c::IMPORT_DESCRIPTOR, "ImportDescriptor", Some(c::PHYSICAL_DESCRIPTOR), true, &[]),
    class(c::RECORDING_DESCRIPTOR, "RecordingDescriptor", Some(c::PHYSICAL_DESCRIPTOR), true, &[]),
    class(c::BWF_IMPORT_DESCRIPTOR, "BWFImportDescriptor", Some(c::IMPORT_DESCRIPTOR), true, &[]),
    class(c::TAPE_DESCRIPTOR, "TapeDescriptor", Some(c::ESSENCE_DESCRIPTOR), true, &[]),
    class(c::FILM_DESCRIPTOR, "FilmDescriptor", Some(c::ESSENCE_DESCRIPTOR), true, &[]),
    class(c::AUXILIARY_DESCRIPTOR, "AuxiliaryDescriptor", Some(c::PHYSICAL_DESCRIPTOR), true, &[]),

    // Locators
    class(c::LOCATOR, "Locator", IO, false, &[]),
    class(c::NETWORK_LOCATOR, "NetworkLocator", Some(c::LOCATOR), true, &[
        req(pid::NETWORK_LOCATOR_URL_STRING, "URLString"),
    ]),
    class(c::TEXT_LOCATOR, "TextLocator", Some(c::LOCATOR), true, &[
        req(pid::TEXT_LOCATOR_NAME, "Name"),
    ]),
];
