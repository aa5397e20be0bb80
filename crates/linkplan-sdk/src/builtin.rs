//! Built-in descriptor for the Vivox core voice SDK.

use linkplan_platform::Platform;

use crate::descriptor::{PathRef, PlatformRules, SdkDescriptor, StagingCategory};

/// Name the Vivox descriptor is registered under.
pub const VIVOX_CORE: &str = "VivoxCoreLibrary";

/// Where the SDK module is installed inside the engine tree.
pub const VIVOX_PLUGIN_DIR: &str = "Plugins/VivoxCore/Source/ThirdParty/VivoxCoreLibrary";

const MAC_DYLIBS: [&str; 2] = ["libortp.dylib", "libvivoxsdk.dylib"];

/// The Vivox 5.7.0 dependency table. Built fresh on every call.
pub fn vivox_core() -> SdkDescriptor {
    let mac = MAC_DYLIBS.iter().fold(
        PlatformRules::new("Mac").include("include"),
        |rules, lib| {
            let staged = format!("Release/{lib}");
            rules
                .delay_load(PathRef::engine_plugin(staged.clone()))
                .stage_to(
                    PathRef::module(staged.clone()),
                    PathRef::engine_plugin(staged),
                    StagingCategory::NonUfs,
                )
        },
    );

    SdkDescriptor::new(VIVOX_CORE, semver::Version::new(5, 7, 0))
        .with_plugin_dir(VIVOX_PLUGIN_DIR)
        .with_platform(
            Platform::Win64,
            PlatformRules::new("Windows")
                .include("include")
                .library("x64/Release/vivoxsdk.lib")
                .delay_load(PathRef::bare("vivoxsdk.dll"))
                .stage(PathRef::module("x64/Release/vivoxsdk.dll"), StagingCategory::NonUfs),
        )
        .with_platform(
            Platform::XboxOne,
            PlatformRules::new("XB1")
                .include("include")
                .library("bin/vivoxsdk.lib"),
        )
        .with_platform(
            Platform::Ps4,
            PlatformRules::new("PlayStation4")
                .include("include")
                .library("bin/libvivoxsdk.a")
                .system_library("SceSha1")
                .system_library("SceAudioIn_stub_weak")
                .system_library("SceHmac"),
        )
        .with_platform(Platform::Mac, mac)
        .with_platform(
            Platform::Android,
            PlatformRules::new("Android")
                .include("include")
                .library("Release/libs/arm64-v8a/libvivox-sdk.so")
                .library("Release/libs/armeabi-v7a/libvivox-sdk.so")
                .library("Release/libs/x86/libvivox-sdk.so")
                .module_dependency("Launch")
                .receipt(
                    "AndroidPlugin",
                    PathRef::module_from_engine("VivoxCoreSDK_UPL.xml"),
                ),
        )
        .with_platform(
            Platform::Ios,
            PlatformRules::new("IOS")
                .include("include")
                .library("bin/Release/libvivoxsdk.a")
                .framework("CFNetwork")
                .framework("AVFoundation"),
        )
        .with_platform(
            Platform::Switch,
            PlatformRules::new("NX")
                .include("include")
                .library("bin/libvivoxsdk.a")
                .system_library("curl")
                .system_library("z"),
        )
}
