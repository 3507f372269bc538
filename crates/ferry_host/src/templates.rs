//! Generated host files: build descriptors, precompiled headers and
//! registration lines.

use std::fmt::Write as _;
use std::path::Path;

use ferry_common::RuntimePaths;

const BANNER: &str = "// This file is generated by ferry and edits will be overwritten!";

/// The registration line that makes the host build a module.
pub fn registration_line(host_name: &str) -> String {
    format!("OutExtraModuleNames.Add(\"{host_name}\");")
}

/// Escapes a path for a host-language string literal.
pub fn escape_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "\\\\")
}

/// Renders the build descriptor (`<HostName>.Build.cs`) for one module.
pub fn build_descriptor(
    host_name: &str,
    dependencies: &[String],
    runtime: &RuntimePaths,
) -> String {
    let mut deps = String::new();
    for dep in dependencies {
        let _ = writeln!(deps, "                \"{dep}\",");
    }
    format!(
        "{BANNER}

using UnrealBuildTool;
using System.Diagnostics;
using System.IO;

public class {host_name} : ModuleRules
{{
    public {host_name}(TargetInfo Target)
    {{
        // generated extension code shadows freely
        bEnableShadowVariableWarnings = false;

        PublicDependencyModuleNames.AddRange(
            new string[] {{
{deps}            }}
        );

        PrivateIncludePaths.Add(\"{include}\");
        PublicLibraryPaths.Add(\"{lib_dir}\");
        PublicAdditionalLibraries.Add(\"{lib}\");
    }}
}}
",
        include = escape_path(&runtime.include_root),
        lib_dir = escape_path(&runtime.lib_dir),
        lib = escape_path(&runtime.library()),
    )
}

/// Renders the module's precompiled header.
pub fn precompiled_header() -> String {
    format!(
        "{BANNER}

#pragma warning (disable:4510)
#pragma warning (disable:4610)
#pragma warning (disable:4146)

#include \"Core.h\"
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn runtime() -> RuntimePaths {
        RuntimePaths {
            include_root: PathBuf::from(r"C:\Python27\include_ferry"),
            header_subdir: "Python".to_string(),
            lib_dir: PathBuf::from(r"C:\Python27\libs"),
            lib_name: "python27.lib".to_string(),
        }
    }

    #[test]
    fn descriptor_names_module_and_dependencies() {
        let deps = vec!["Core".to_string(), "Engine".to_string()];
        let out = build_descriptor("Ferry_Alpha", &deps, &runtime());
        assert!(out.starts_with(BANNER));
        assert!(out.contains("public class Ferry_Alpha : ModuleRules"));
        assert!(out.contains("public Ferry_Alpha(TargetInfo Target)"));
        assert!(out.contains(
            "            new string[] {\n                \"Core\",\n                \"Engine\",\n            }\n"
        ));
        assert!(out.contains("bEnableShadowVariableWarnings = false;"));
    }

    #[test]
    fn descriptor_escapes_backslashes() {
        let out = build_descriptor("Ferry_Alpha", &[], &runtime());
        assert!(out.contains(r#"PrivateIncludePaths.Add("C:\\Python27\\include_ferry");"#));
        assert!(out.contains(r#"PublicLibraryPaths.Add("C:\\Python27\\libs");"#));
    }

    #[cfg(unix)]
    #[test]
    fn descriptor_library_path() {
        let rt = RuntimePaths {
            include_root: PathBuf::from("/opt/py/include_ferry"),
            header_subdir: "Python".to_string(),
            lib_dir: PathBuf::from("/opt/py/lib"),
            lib_name: "libpython2.7.so".to_string(),
        };
        let out = build_descriptor("Ferry_Alpha", &[], &rt);
        assert!(out.contains("PublicAdditionalLibraries.Add(\"/opt/py/lib/libpython2.7.so\");"));
    }

    #[test]
    fn pch_suppresses_warnings_and_includes_core() {
        let pch = precompiled_header();
        assert!(pch.contains("#pragma warning (disable:4146)"));
        assert!(pch.ends_with("#include \"Core.h\"\n"));
    }

    #[test]
    fn registration() {
        assert_eq!(
            registration_line("Ferry_Alpha"),
            "OutExtraModuleNames.Add(\"Ferry_Alpha\");"
        );
    }
}
